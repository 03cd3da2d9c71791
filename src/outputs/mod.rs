//! Persistence of the accumulating dataset.
//!
//! # Submodules
//!
//! - [`xlsx`]: spreadsheet form, read at startup and rewritten on every checkpoint
//! - [`csv_file`]: comma-separated form, written once at the end of a run
//!
//! The [`DatasetStore`] keeps every record in memory. Saving always rewrites
//! the whole file; there is no incremental append on disk and no delete.
//!
//! # Output Structure
//!
//! ```text
//! bilim_articles_300_final.xlsx   # primary table, resumed from on restart
//! bilim_articles_300_final.csv    # final export
//! ```

pub mod csv_file;
pub mod xlsx;

use crate::errors::HarvestError;
use crate::models::ArticleRecord;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// In-memory record set plus the two files it is persisted to.
#[derive(Debug)]
pub struct DatasetStore {
    spreadsheet_path: PathBuf,
    csv_path: PathBuf,
    records: Vec<ArticleRecord>,
}

impl DatasetStore {
    /// An empty store that will write to the given paths.
    pub fn new(spreadsheet_path: impl Into<PathBuf>, csv_path: impl Into<PathBuf>) -> Self {
        Self {
            spreadsheet_path: spreadsheet_path.into(),
            csv_path: csv_path.into(),
            records: Vec::new(),
        }
    }

    /// Open the store, loading the spreadsheet if one exists.
    ///
    /// A missing spreadsheet yields an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the spreadsheet exists but cannot be read or parsed.
    #[instrument(level = "info", skip_all, fields(path = %spreadsheet_path.as_ref().display()))]
    pub async fn load(
        spreadsheet_path: impl AsRef<Path>,
        csv_path: impl AsRef<Path>,
    ) -> Result<Self, HarvestError> {
        let path = spreadsheet_path.as_ref();
        let mut store = Self::new(path, csv_path.as_ref());
        match fs::read(path).await {
            Ok(bytes) => {
                store.records = xlsx::decode(bytes).map_err(|e| match e {
                    HarvestError::Dataset { reason, .. } => {
                        HarvestError::dataset(path.display().to_string(), reason)
                    }
                    other => other,
                })?;
                info!(
                    rows = store.records.len(),
                    next_text_id = store.next_text_id(),
                    "Resuming from existing dataset"
                );
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No existing dataset; starting fresh");
            }
            Err(e) => return Err(e.into()),
        }
        Ok(store)
    }

    pub fn records(&self) -> &[ArticleRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// One past the highest `text_id` in the store, or 1 when it is empty.
    pub fn next_text_id(&self) -> u64 {
        self.records
            .iter()
            .map(|r| r.text_id)
            .max()
            .map_or(1, |max| max + 1)
    }

    /// Append the records of one accepted article.
    pub fn extend(&mut self, records: Vec<ArticleRecord>) {
        self.records.extend(records);
    }

    /// Rewrite the spreadsheet with every record held in memory.
    #[instrument(level = "info", skip_all, fields(rows = self.records.len()))]
    pub async fn checkpoint(&self) -> Result<(), HarvestError> {
        let bytes = xlsx::encode(&self.records)?;
        write_replacing(&self.spreadsheet_path, &bytes).await?;
        info!(path = %self.spreadsheet_path.display(), "Checkpoint written");
        Ok(())
    }

    /// Write both the CSV export and the spreadsheet.
    #[instrument(level = "info", skip_all, fields(rows = self.records.len()))]
    pub async fn write_final(&self) -> Result<(), HarvestError> {
        let csv = csv_file::encode(&self.records)?;
        write_replacing(&self.csv_path, &csv).await?;
        info!(path = %self.csv_path.display(), "Wrote CSV");
        self.checkpoint().await
    }

    pub fn spreadsheet_path(&self) -> &Path {
        &self.spreadsheet_path
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

/// Write `bytes` to a sibling temporary file, then rename it over `path`.
async fn write_replacing(path: &Path, bytes: &[u8]) -> Result<(), HarvestError> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    let with_path = |e: std::io::Error| HarvestError::dataset(path.display().to_string(), e);

    fs::write(&tmp, bytes).await.map_err(with_path)?;
    fs::rename(&tmp, path).await.map_err(with_path)
}
