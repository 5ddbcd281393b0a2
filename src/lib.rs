//! pch_looking_glass library: PCH looking glass polling client
//!
//! This library implements the client protocol of the PCH looking glass
//! lookup service: it discovers the directory of IXP routers, authenticates
//! each query with single-use nonces delivered via both query string and
//! cookie, extracts the four numeric summary fields from the free-text
//! result, and records them through one or more persistence backends.
//!
//! # Example
//!
//! ```no_run
//! use pch_looking_glass::{run_poll, Config};
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     ixp: Some("BeirutIX".to_string()),
//!     ixp_city: Some("Beirut".to_string()),
//!     ixp_country: Some("Lebanon".to_string()),
//!     ..Default::default()
//! };
//!
//! let report = run_poll(config, CancellationToken::new()).await?;
//! println!("Persisted {} of {} routers", report.persisted, report.total_routers);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your
//! application or ensure you're calling library functions within an async
//! context.

#![warn(missing_docs)]

pub mod config;
mod directory;
mod error_handling;
mod fetch;
mod initialization;
mod models;
mod nonce;
mod query;
mod storage;
mod summary;

#[cfg(test)]
mod test_support;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel, StoreKind};
pub use directory::{parse_directory, RouterDirectory, SortOrder};
pub use error_handling::{
    DirectoryError, FetchError, InitializationError, PollError, QueryError, StorageError,
    SummaryParseError,
};
pub use fetch::{HttpFetcher, TextFetcher};
pub use initialization::{init_fetcher, init_logger_with, init_stores};
pub use models::{IpVersion, Router, RouterSummary};
pub use nonce::{generate_nonce, NoncePair};
pub use query::{QueryClient, QueryKind};
pub use run::{run_poll, PollReport};
pub use storage::{JsonFileStore, PostgresStore, SqliteStore, SummaryRecord, SummaryStore};
pub use summary::{parse_or_unknown, parse_summary, SummaryMetrics, UNKNOWN_METRIC};

// Internal run module (contains the polling orchestrator)
mod run {
    use std::sync::Arc;
    use std::time::Duration;

    use anyhow::{bail, Context, Result};
    use log::{error, info};
    use rand::Rng;
    use tokio_util::sync::CancellationToken;
    use url::Url;

    use crate::config::{Config, DIRECTORY_PATH, POLL_SLEEP_MAX_SECS, POLL_SLEEP_MIN_SECS, QUERY_PATH};
    use crate::directory::RouterDirectory;
    use crate::error_handling::PollError;
    use crate::fetch::TextFetcher;
    use crate::initialization::{init_fetcher, init_stores};
    use crate::models::{IpVersion, Router, RouterSummary};
    use crate::query::QueryClient;
    use crate::storage::SummaryStore;
    use crate::summary::{parse_or_unknown, SummaryMetrics};

    /// Results of a polling run.
    ///
    /// Contains summary statistics about the completed run.
    #[derive(Debug, Clone)]
    pub struct PollReport {
        /// Routers the run attempted to poll
        pub total_routers: usize,
        /// Summaries written to every configured store
        pub persisted: usize,
        /// Summaries recorded with sentinel metrics (router unreachable or
        /// summary unparsable)
        pub degraded: usize,
        /// Routers with at least one storage failure
        pub failed: usize,
        /// Elapsed time in seconds
        pub elapsed_seconds: f64,
        /// True when the run was cancelled before finishing
        pub cancelled: bool,
    }

    impl PollReport {
        fn empty(total_routers: usize) -> Self {
            Self {
                total_routers,
                persisted: 0,
                degraded: 0,
                failed: 0,
                elapsed_seconds: 0.0,
                cancelled: false,
            }
        }
    }

    /// The wired components one polling run operates on.
    pub(crate) struct PollContext {
        pub directory: RouterDirectory,
        pub query_client: QueryClient,
        pub stores: Vec<Box<dyn SummaryStore>>,
    }

    /// Runs a polling cycle with the provided configuration.
    ///
    /// This is the main entry point for the library. With the full identity
    /// triple configured it polls that single router once; otherwise it
    /// iterates the whole directory, pausing a randomized 10-20 seconds
    /// between routers. The pause is interruptible: cancelling `cancel`
    /// ends the run between iterations.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The identity triple is only partially specified
    /// - A component (HTTP client, storage backend) cannot be initialized
    /// - The router directory is unobtainable
    /// - Single-router mode names a triple the directory doesn't contain
    pub async fn run_poll(config: Config, cancel: CancellationToken) -> Result<PollReport> {
        if config.partial_router_selection() {
            bail!("single-router mode needs --ixp, --ixp-city and --ixp-country together");
        }

        let base_url = Url::parse(&config.base_url).context("Invalid base URL")?;
        let directory_url = base_url
            .join(DIRECTORY_PATH)
            .context("Invalid directory URL")?;
        let query_url = base_url.join(QUERY_PATH).context("Invalid query URL")?;

        let fetcher: Arc<dyn TextFetcher> =
            init_fetcher(&config).context("Failed to initialize HTTP client")?;
        let ctx = PollContext {
            directory: RouterDirectory::new(
                Arc::clone(&fetcher),
                directory_url,
                &config.cache_file,
            ),
            query_client: QueryClient::new(fetcher, query_url),
            stores: init_stores(&config)
                .await
                .context("Failed to initialize storage backends")?,
        };

        let start_time = std::time::Instant::now();

        let mut report = match config.single_router() {
            Some((ixp, city, country)) => {
                run_single(
                    &ctx,
                    ixp,
                    city,
                    country,
                    config.ip_version,
                    config.force_refresh,
                )
                .await?
            }
            None => run_all(&ctx, config.ip_version, config.force_refresh, &cancel).await?,
        };

        report.elapsed_seconds = start_time.elapsed().as_secs_f64();
        info!(
            "Run finished: {}/{} routers persisted in {:.1}s",
            report.persisted, report.total_routers, report.elapsed_seconds
        );
        Ok(report)
    }

    /// Polls every router in the directory sequentially.
    pub(crate) async fn run_all(
        ctx: &PollContext,
        ip_version: IpVersion,
        force_refresh: bool,
        cancel: &CancellationToken,
    ) -> Result<PollReport, PollError> {
        let routers = ctx.directory.get_routers(force_refresh).await?;
        info!("Polling {} routers ({})", routers.len(), ip_version);

        let mut report = PollReport::empty(routers.len());
        let last = routers.len().saturating_sub(1);

        for (index, router) in routers.iter().enumerate() {
            if cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }

            poll_router(ctx, router, ip_version, &mut report).await;

            if index == last {
                break;
            }

            // Politeness toward the remote service; the select makes the
            // pause a cancellation point.
            let pause = Duration::from_secs(
                rand::rng().random_range(POLL_SLEEP_MIN_SECS..=POLL_SLEEP_MAX_SECS),
            );
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Cancellation requested, stopping after {} routers", index + 1);
                    report.cancelled = true;
                    break;
                }
                _ = tokio::time::sleep(pause) => {}
            }
        }

        Ok(report)
    }

    /// Polls one router looked up by its identity triple, without sleeping.
    pub(crate) async fn run_single(
        ctx: &PollContext,
        ixp: &str,
        city: &str,
        country: &str,
        ip_version: IpVersion,
        force_refresh: bool,
    ) -> Result<PollReport, PollError> {
        let router = ctx
            .directory
            .find_router(ixp, city, country, force_refresh)
            .await?
            .ok_or_else(|| PollError::RouterNotFound {
                ixp: ixp.to_string(),
                city: city.to_string(),
                country: country.to_string(),
            })?;

        let mut report = PollReport::empty(1);
        poll_router(ctx, &router, ip_version, &mut report).await;
        Ok(report)
    }

    /// One full cycle for one router: query, parse, fan out to every store.
    ///
    /// Never fails: query and parse failures degrade to the sentinel
    /// record, and storage failures are logged so the remaining routers
    /// still get processed.
    async fn poll_router(
        ctx: &PollContext,
        router: &Router,
        ip_version: IpVersion,
        report: &mut PollReport,
    ) {
        let raw = ctx.query_client.query_summary(&router.id, ip_version).await;
        let metrics = parse_or_unknown(raw.as_deref());
        if metrics == SummaryMetrics::unknown() {
            report.degraded += 1;
        }

        let summary = RouterSummary::from_metrics(router, ip_version, metrics);
        let mut store_failed = false;
        for store in &ctx.stores {
            if let Err(e) = store.upsert(&summary).await {
                error!("{} upsert for {} failed: {e}", store.name(), router.ixp);
                store_failed = true;
            }
        }

        if store_failed {
            report.failed += 1;
        } else {
            report.persisted += 1;
        }
    }
}
