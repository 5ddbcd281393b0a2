//! PostgreSQL persistence backend.
//!
//! Same logical schema as the SQLite store; the replace-on-conflict
//! semantics come from `INSERT ... ON CONFLICT ... DO UPDATE` against the
//! composite primary key.

use async_trait::async_trait;
use sqlx::PgPool;

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

const UPSERT_SQL: &str = "INSERT INTO ixp_info
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
    ON CONFLICT (ixp, ixp_city, ixp_country)
    DO UPDATE SET ixp_ip_version = EXCLUDED.ixp_ip_version,
                  ixp_local_asn = EXCLUDED.ixp_local_asn,
                  ixp_rib_entries = EXCLUDED.ixp_rib_entries,
                  ixp_number_of_peers = EXCLUDED.ixp_number_of_peers,
                  ixp_number_of_neighbors = EXCLUDED.ixp_number_of_neighbors,
                  date_added = EXCLUDED.date_added";

/// Summary store backed by a PostgreSQL server.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connects to the server at `database_url` and ensures the
    /// `ixp_info` table exists.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = PgPool::connect(database_url).await?;
        sqlx::query(CREATE_TABLE_SQL).execute(&pool).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl SummaryStore for PostgresStore {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn upsert(&self, summary: &RouterSummary) -> Result<(), StorageError> {
        let record = SummaryRecord::from_summary(summary);
        sqlx::query(UPSERT_SQL)
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

#[cfg(test)]
mod tests {
    use super::*;

    // Exercising the pool against a live server belongs to integration
    // environments; these tests pin the statements the backend issues.

    #[test]
    fn test_upsert_conflict_target_is_identity_triple() {
        assert!(UPSERT_SQL.contains("ON CONFLICT (ixp, ixp_city, ixp_country)"));
    }

    #[test]
    fn test_upsert_updates_every_non_key_column() {
        for column in [
            "ixp_ip_version",
            "ixp_local_asn",
            "ixp_rib_entries",
            "ixp_number_of_peers",
            "ixp_number_of_neighbors",
            "date_added",
        ] {
            assert!(
                UPSERT_SQL.contains(&format!("{column} = EXCLUDED.{column}")),
                "{column} should be updated on conflict"
            );
        }
    }

    #[test]
    fn test_create_table_matches_sqlite_schema() {
        assert!(CREATE_TABLE_SQL.contains("PRIMARY KEY (ixp, ixp_city, ixp_country)"));
        assert!(CREATE_TABLE_SQL.contains("date_added TEXT"));
    }
}
