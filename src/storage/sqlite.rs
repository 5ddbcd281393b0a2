//! Embedded SQLite persistence backend.
//!
//! The database file is created on first use; `REPLACE INTO` provides the
//! replace-on-conflict semantics against the composite primary key.

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::Path;

use async_trait::async_trait;
use log::{error, info};
use sqlx::SqlitePool;

use super::{SummaryRecord, SummaryStore};
use crate::error_handling::StorageError;
use crate::models::RouterSummary;

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS ixp_info (
    ixp TEXT NOT NULL,
    ixp_city TEXT NOT NULL,
    ixp_country TEXT NOT NULL,
    ixp_ip_version TEXT NOT NULL,
    ixp_local_asn INT,
    ixp_rib_entries INT,
    ixp_number_of_peers INT,
    ixp_number_of_neighbors INT,
    date_added TEXT,
    PRIMARY KEY (ixp, ixp_city, ixp_country)
)";

const REPLACE_INTO_SQL: &str = "REPLACE INTO ixp_info VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)";

/// Summary store backed by an embedded SQLite database.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens the database at `db_path`, creating the file and the
    /// `ixp_info` table if they do not exist yet.
    pub async fn connect(db_path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        match OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(db_path)
        {
            Ok(_) => info!("Database file created successfully."),
            Err(ref e) if e.kind() == ErrorKind::AlreadyExists => {
                info!("Database file already exists.")
            }
            Err(e) => {
                error!("Failed to create database file: {e}");
                return Err(StorageError::Io(e));
            }
        }

        let pool = SqlitePool::connect(&format!("sqlite:{}", db_path.to_string_lossy())).await?;
        sqlx::query(CREATE_TABLE_SQL).execute(&pool).await?;
        Ok(Self { pool })
    }

    /// In-memory database for tests.
    #[cfg(test)]
    pub async fn connect_in_memory() -> Result<Self, StorageError> {
        let pool = SqlitePool::connect("sqlite::memory:").await?;
        sqlx::query(CREATE_TABLE_SQL).execute(&pool).await?;
        Ok(Self { pool })
    }

    /// Handle for direct assertions against the database.
    #[cfg(test)]
    pub fn pool(&self) -> SqlitePool {
        self.pool.clone()
    }
}

#[async_trait]
impl SummaryStore for SqliteStore {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn upsert(&self, summary: &RouterSummary) -> Result<(), StorageError> {
        let record = SummaryRecord::from_summary(summary);
        sqlx::query(REPLACE_INTO_SQL)
            .bind(&record.ixp)
            .bind(&record.ixp_city)
            .bind(&record.ixp_country)
            .bind(&record.ixp_ip_version)
            .bind(record.ixp_local_asn)
            .bind(record.ixp_rib_entries)
            .bind(record.ixp_number_of_peers)
            .bind(record.ixp_number_of_neighbors)
            .bind(&record.date_added)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
