//! Error type shared by the harvesting components.
//!
//! Policy rejections (duplicates, blocked keywords, low-quality titles) are not
//! errors; they are reported through [`crate::pipeline::SkipReason`]. Missing
//! page fields are not errors either, they fall back to sentinel values.

use thiserror::Error;

/// Failures that can abandon an article, a listing page or the whole run.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// The page could not be downloaded or its body could not be read.
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },
    /// The server answered, but not with a success status.
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },
    /// The translation backend failed for one piece of text.
    #[error("translation failed: {0}")]
    Translation(String),
    /// A document selector could not be compiled.
    #[error("invalid selector `{0}`")]
    Selector(String),
    /// The persisted dataset could not be read or written.
    #[error("dataset {path}: {reason}")]
    Dataset { path: String, reason: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl HarvestError {
    pub fn dataset(path: impl Into<String>, reason: impl ToString) -> Self {
        HarvestError::Dataset {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
