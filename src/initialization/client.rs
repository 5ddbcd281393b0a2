//! HTTP client initialization.

use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::Config;
use crate::error_handling::InitializationError;
use crate::fetch::HttpFetcher;

/// Initializes the shared HTTP fetcher.
///
/// Creates a `reqwest::Client` configured with the User-Agent and timeout
/// from the configuration. The timeout applies to every request made
/// through the fetcher.
///
/// # Errors
///
/// Returns an `InitializationError` if client creation fails.
pub fn init_fetcher(config: &Config) -> Result<Arc<HttpFetcher>, InitializationError> {
    let client = ClientBuilder::new()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(config.user_agent.clone())
        .build()?;
    Ok(Arc::new(HttpFetcher::new(Arc::new(client))))
}
