//! Page fetching and document extraction for the source catalog.
//!
//! Scraping follows a two-phase pattern:
//!
//! 1. **Indexing** ([`links`]): walk the paginated listing and collect article URLs
//! 2. **Extraction** ([`article`]): fetch each article page and pull out its fields
//!
//! Both phases sit on two seams so the network and the markup contract can be
//! replaced in tests:
//!
//! - [`PageSource`]: downloads a page body ([`HttpPageSource`] in production)
//! - [`DocumentExtractor`]: one method per field of the site's markup
//!   ([`bilim::BilimSelectors`] for bilim-all.kz)

use crate::errors::HarvestError;
use reqwest::Client;
use scraper::Html;
use std::time::Duration;
use tracing::{debug, instrument};

pub mod article;
pub mod bilim;
pub mod links;

/// Something that can return the HTML body of a URL.
pub trait PageSource {
    async fn fetch_page(&self, url: &str) -> Result<String, HarvestError>;
}

/// Field-level access to a parsed page of the source site.
///
/// Implementations return `None` or an empty list when the field is absent;
/// sentinel substitution is left to the caller.
pub trait DocumentExtractor {
    /// Raw `href` values of the article links on a listing page.
    fn article_links(&self, doc: &Html) -> Vec<String>;
    fn title(&self, doc: &Html) -> Option<String>;
    fn author(&self, doc: &Html) -> Option<String>;
    /// The secondary category label of an article page.
    fn subcategory(&self, doc: &Html) -> Option<String>;
    /// Text of every paragraph in the content container, in document order.
    fn paragraphs(&self, doc: &Html) -> Vec<String>;
}

/// [`PageSource`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: Client,
}

impl HttpPageSource {
    pub fn new() -> Result<Self, HarvestError> {
        let client = Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| HarvestError::Fetch {
                url: String::new(),
                reason: format!("cannot build HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }
}

impl PageSource for HttpPageSource {
    #[instrument(level = "debug", skip(self))]
    async fn fetch_page(&self, url: &str) -> Result<String, HarvestError> {
        let fetch_error = |e: reqwest::Error| HarvestError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        };
        let response = self.client.get(url).send().await.map_err(fetch_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(HarvestError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.text().await.map_err(fetch_error)?;
        debug!(bytes = body.len(), "Fetched page");
        Ok(body)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory [`PageSource`] shared by the scraper and pipeline tests.

    use super::PageSource;
    use crate::errors::HarvestError;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Debug, Default)]
    pub struct StaticPages {
        pages: HashMap<String, String>,
        pub requests: RefCell<Vec<String>>,
    }

    impl StaticPages {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_page(mut self, url: &str, body: impl Into<String>) -> Self {
            self.pages.insert(url.to_string(), body.into());
            self
        }

        pub fn insert(&mut self, url: &str, body: impl Into<String>) {
            self.pages.insert(url.to_string(), body.into());
        }
    }

    impl PageSource for StaticPages {
        async fn fetch_page(&self, url: &str) -> Result<String, HarvestError> {
            self.requests.borrow_mut().push(url.to_string());
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| HarvestError::Status {
                    url: url.to_string(),
                    status: 404,
                })
        }
    }
}
