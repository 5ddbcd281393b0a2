//! Flat-file JSON persistence backend.
//!
//! One file per router/IP-version combination, fully overwritten on every
//! upsert. The data directory is created on demand.

use std::path::PathBuf;

use async_trait::async_trait;
use log::debug;

use super::{SummaryRecord, SummaryStore};
use crate::error_handling::StorageError;
use crate::models::RouterSummary;

/// Summary store that writes pretty-printed JSON files into a directory.
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    /// Creates a store rooted at `data_dir`. The directory itself is
    /// created lazily on the first write.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// The file a summary is written to.
    pub fn file_path(&self, summary: &RouterSummary) -> PathBuf {
        self.data_dir.join(file_name(summary))
    }
}

/// Lowercases and replaces anything outside `[a-z0-9]` so identity fields
/// with spaces or punctuation stay filesystem-safe.
fn slug(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

fn file_name(summary: &RouterSummary) -> String {
    format!(
        "{}_{}_{}_{}.json",
        slug(&summary.ixp),
        slug(&summary.city),
        slug(&summary.country),
        summary.ip_version
    )
}

#[async_trait]
impl SummaryStore for JsonFileStore {
    fn name(&self) -> &'static str {
        "json-file"
    }

    async fn upsert(&self, summary: &RouterSummary) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.data_dir).await?;

        let record = SummaryRecord::from_summary(summary);
        let raw = serde_json::to_vec_pretty(&record)?;
        let path = self.data_dir.join(file_name(summary));
        tokio::fs::write(&path, raw).await?;
        debug!("Wrote summary to {}", path.display());
        Ok(())
    }
}
