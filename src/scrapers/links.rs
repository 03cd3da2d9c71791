//! Article URL discovery over the paginated listing.

use super::bilim::SiteProfile;
use super::{DocumentExtractor, PageSource};
use scraper::Html;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

/// Walks listing pages 1, 2, … and gathers article URLs.
pub struct LinkCollector<'a, P, D> {
    source: &'a P,
    document: &'a D,
    site: &'a SiteProfile,
    /// Highest listing page index that will be requested.
    max_pages: u32,
    /// Pause between two listing requests.
    page_delay: Duration,
}

impl<'a, P, D> LinkCollector<'a, P, D>
where
    P: PageSource,
    D: DocumentExtractor,
{
    pub fn new(
        source: &'a P,
        document: &'a D,
        site: &'a SiteProfile,
        max_pages: u32,
        page_delay: Duration,
    ) -> Self {
        Self {
            source,
            document,
            site,
            max_pages,
            page_delay,
        }
    }

    /// Collect up to `max_links` absolute article URLs, in listing order.
    ///
    /// Stops as soon as `max_links` URLs are gathered or `max_pages` pages
    /// have been visited. A listing page that cannot be fetched is logged and
    /// skipped. Links are not deduplicated here.
    #[instrument(level = "info", skip(self))]
    pub async fn collect(&self, max_links: usize) -> Vec<String> {
        let mut links = Vec::new();

        for page in 1..=self.max_pages {
            if links.len() >= max_links {
                break;
            }
            if page > 1 {
                sleep(self.page_delay).await;
            }

            let url = self.site.listing_url(page);
            let body = match self.source.fetch_page(&url).await {
                Ok(body) => body,
                Err(e) => {
                    warn!(%url, error = %e, "Listing page failed; skipping");
                    continue;
                }
            };

            let hrefs = {
                let doc = Html::parse_document(&body);
                self.document.article_links(&doc)
            };
            let before = links.len();
            for href in hrefs {
                if links.len() >= max_links {
                    break;
                }
                match self.site.resolve(&href) {
                    Some(absolute) => links.push(absolute),
                    None => debug!(%href, "Unresolvable article link"),
                }
            }
            debug!(page, found = links.len() - before, "Indexed listing page");
        }

        info!(count = links.len(), "Collected article links");
        links
    }
}
