//! Shared test doubles.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error_handling::FetchError;
use crate::fetch::TextFetcher;

/// A recorded `fetch_text` invocation.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub params: Vec<(String, String)>,
    pub cookie: Option<String>,
}

/// Scripted `TextFetcher` double.
///
/// Returns its canned responses in order and records every invocation so
/// tests can assert call counts and request shapes. Once the script is
/// exhausted, further calls fail like an unreachable server.
pub struct MockFetcher {
    responses: Mutex<VecDeque<Result<String, FetchError>>>,
    calls: AtomicUsize,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockFetcher {
    pub fn with_responses(responses: Vec<Result<String, FetchError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A constructible transport failure for scripting error paths.
    pub fn unavailable(url: &str) -> FetchError {
        FetchError::Status {
            status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            url: url.to_string(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

#[async_trait]
impl TextFetcher for MockFetcher {
    async fn fetch_text(
        &self,
        url: &str,
        params: &[(String, String)],
        cookie: Option<&str>,
    ) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .expect("requests lock")
            .push(RecordedRequest {
                url: url.to_string(),
                params: params.to_vec(),
                cookie: cookie.map(str::to_string),
            });
        self.responses
            .lock()
            .expect("responses lock")
            .pop_front()
            .unwrap_or_else(|| Err(Self::unavailable(url)))
    }
}
