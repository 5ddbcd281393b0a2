//! Authenticated text fetching over HTTP.
//!
//! One GET per invocation, no retry at this layer. Any transport-level
//! failure (DNS, timeout, non-success status) surfaces as a [`FetchError`]
//! that callers treat as "no data available now", never as fatal.

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::header::COOKIE;

use crate::error_handling::FetchError;

/// Performs authenticated GET requests returning the response body as text.
///
/// The trait seam exists so directory and query clients can be exercised
/// against a scripted transport in tests.
#[async_trait]
pub trait TextFetcher: Send + Sync {
    /// Makes a single GET request to `url`.
    ///
    /// `params` are appended to the query string; `cookie` becomes the
    /// `Cookie` header when present. The body is decoded to text honoring
    /// the response-declared character encoding.
    async fn fetch_text(
        &self,
        url: &str,
        params: &[(String, String)],
        cookie: Option<&str>,
    ) -> Result<String, FetchError>;
}

/// The production `TextFetcher` backed by a shared `reqwest` client.
///
/// User-Agent and timeout are configured once on the client at
/// construction (see `initialization::init_fetcher`).
pub struct HttpFetcher {
    client: Arc<reqwest::Client>,
}

impl HttpFetcher {
    /// Wraps a configured `reqwest` client.
    pub fn new(client: Arc<reqwest::Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TextFetcher for HttpFetcher {
    async fn fetch_text(
        &self,
        url: &str,
        params: &[(String, String)],
        cookie: Option<&str>,
    ) -> Result<String, FetchError> {
        debug!(
            "url: {url} params: {params:?} cookie set: {}",
            cookie.is_some()
        );

        let mut request = self.client.get(url);
        if !params.is_empty() {
            request = request.query(params);
        }
        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie);
        }

        let response = request.send().await.map_err(|e| {
            error!("Error getting the URL {url}: {e}");
            FetchError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            error!("Error getting the URL {url}: HTTP {status}");
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }

        // text() decodes using the charset the response declares
        response.text().await.map_err(|e| {
            error!("Error reading the body of {url}: {e}");
            FetchError::from(e)
        })
    }
}
