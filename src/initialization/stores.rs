//! Persistence backend initialization.

use log::info;

use crate::config::{Config, StoreKind};
use crate::error_handling::InitializationError;
use crate::storage::{JsonFileStore, PostgresStore, SqliteStore, SummaryStore};

/// Builds the persistence backends selected by the configuration.
///
/// Each configured backend is connected and its schema ensured before the
/// polling run starts.
///
/// # Errors
///
/// Returns an `InitializationError` when a backend cannot be connected, or
/// when the postgres store is selected without a connection URL.
pub async fn init_stores(
    config: &Config,
) -> Result<Vec<Box<dyn SummaryStore>>, InitializationError> {
    let mut stores: Vec<Box<dyn SummaryStore>> = Vec::new();

    for kind in &config.stores {
        match kind {
            StoreKind::JsonFile => {
                stores.push(Box::new(JsonFileStore::new(&config.data_dir)));
            }
            StoreKind::Sqlite => {
                stores.push(Box::new(SqliteStore::connect(&config.db_path).await?));
            }
            StoreKind::Postgres => {
                let url = config
                    .postgres_url
                    .as_deref()
                    .ok_or(InitializationError::MissingPostgresUrl)?;
                stores.push(Box::new(PostgresStore::connect(url).await?));
            }
        }
    }

    info!(
        "Recording summaries to: {}",
        stores
            .iter()
            .map(|s| s.name())
            .collect::<Vec<_>>()
            .join(", ")
    );

    Ok(stores)
}
