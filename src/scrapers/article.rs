//! Extraction of a single article page.

use super::bilim::{LOW_QUALITY_TITLE_MARKER, UNKNOWN_AUTHOR, UNSPECIFIED_SUBCATEGORY, UNTITLED};
use super::{DocumentExtractor, PageSource};
use crate::errors::HarvestError;
use crate::models::ScrapedArticle;
use scraper::Html;
use tracing::{debug, instrument};

/// Result of extracting one article page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Article(ScrapedArticle),
    /// The title carries the low-quality marker; nothing else was extracted.
    LowQualityTitle(String),
}

/// Fetches article pages and turns them into [`ScrapedArticle`]s.
pub struct ArticleExtractor<'a, P, D> {
    source: &'a P,
    document: &'a D,
}

impl<'a, P, D> ArticleExtractor<'a, P, D>
where
    P: PageSource,
    D: DocumentExtractor,
{
    pub fn new(source: &'a P, document: &'a D) -> Self {
        Self { source, document }
    }

    /// Fetch `url` and extract its fields.
    ///
    /// Missing title, author and subcategory are replaced with sentinel
    /// values. Empty paragraphs are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::Fetch`] or [`HarvestError::Status`] when the
    /// page cannot be downloaded.
    #[instrument(level = "debug", skip(self))]
    pub async fn extract(&self, url: &str) -> Result<Extraction, HarvestError> {
        let body = self.source.fetch_page(url).await?;
        let doc = Html::parse_document(&body);
        Ok(self.extract_document(url, &doc))
    }

    fn extract_document(&self, url: &str, doc: &Html) -> Extraction {
        let title = self
            .document
            .title(doc)
            .unwrap_or_else(|| UNTITLED.to_string());
        if has_low_quality_marker(&title) {
            return Extraction::LowQualityTitle(title);
        }

        let author = self
            .document
            .author(doc)
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());
        let subcategory = self
            .document
            .subcategory(doc)
            .unwrap_or_else(|| UNSPECIFIED_SUBCATEGORY.to_string());
        let paragraphs: Vec<String> = self
            .document
            .paragraphs(doc)
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        debug!(paragraphs = paragraphs.len(), "Extracted article");

        Extraction::Article(ScrapedArticle {
            url: url.to_string(),
            title,
            author,
            subcategory,
            paragraphs,
        })
    }
}

pub fn has_low_quality_marker(title: &str) -> bool {
    title.to_lowercase().contains(LOW_QUALITY_TITLE_MARKER)
}
