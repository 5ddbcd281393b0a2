//! Persistence adapters.
//!
//! Three backends share one interface and one logical schema: the router
//! identity triple as composite primary key, the four numeric fields, the
//! IP version, and a `date_added` stamp set at write time. All of them
//! replace on conflict: re-polling a router overwrites its prior row
//! instead of duplicating it.

mod json_file;
mod models;
mod postgres;
mod sqlite;

// Re-export public API
pub use json_file::JsonFileStore;
pub use models::SummaryRecord;
pub use postgres::PostgresStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;

use crate::error_handling::StorageError;
use crate::models::RouterSummary;

/// A persistence backend for router summaries.
#[async_trait]
pub trait SummaryStore: Send + Sync {
    /// Short backend name used in log messages.
    fn name(&self) -> &'static str;

    /// Inserts or replaces the record for the summary's identity triple.
    async fn upsert(&self, summary: &RouterSummary) -> Result<(), StorageError>;
}
