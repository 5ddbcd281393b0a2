//! The nonce-authenticated looking glass query protocol.
//!
//! The query endpoint validates a pseudo-CSRF handshake: the `pch_nonce`
//! query parameter must be matched by a cookie assignment for the same
//! nonce, alongside a cookie assignment for a second, independent nonce.
//! The handshake is intentionally odd but required; the server rejects
//! simplified variants, so it is reproduced exactly.
//!
//! Outcome convention: `None` is a hard failure (transport, malformed
//! response, bad status, invalid kind); `Some("")` is the degraded
//! "no usable data" outcome (router offline, or a summary without the
//! expected marker); `Some(text)` is usable output.

use std::str::FromStr;
use std::sync::Arc;

use log::{error, info, warn};
use serde::Deserialize;
use strum_macros::EnumIter;
use url::Url;

use crate::config::{ROUTER_OFFLINE_SENTINEL, SUMMARY_MARKER};
use crate::error_handling::QueryError;
use crate::fetch::TextFetcher;
use crate::models::IpVersion;
use crate::nonce::NoncePair;

/// The query kinds the service supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum QueryKind {
    /// IPv4 BGP summary (no arguments)
    Summary,
    /// IPv6 BGP summary (no arguments)
    V6Summary,
    /// IPv4 prefix lookup
    Prefix,
    /// IPv6 prefix lookup
    V6Prefix,
    /// AS-path regular expression lookup
    Regex,
}

impl QueryKind {
    /// Wire name of the kind in the `query` parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            QueryKind::Summary => "summary",
            QueryKind::V6Summary => "v6_summary",
            QueryKind::Prefix => "prefix",
            QueryKind::V6Prefix => "v6_prefix",
            QueryKind::Regex => "regex",
        }
    }

    /// The summary kinds are the ones whose result must carry the
    /// `BGP router identifier` marker to count as usable.
    fn expects_summary_output(self) -> bool {
        matches!(self, QueryKind::Summary | QueryKind::V6Summary)
    }

    /// The summary kind for an IP version.
    pub fn summary_for(ip_version: IpVersion) -> Self {
        match ip_version {
            IpVersion::Ipv4 => QueryKind::Summary,
            IpVersion::Ipv6 => QueryKind::V6Summary,
        }
    }
}

impl FromStr for QueryKind {
    type Err = QueryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "summary" => Ok(QueryKind::Summary),
            "v6_summary" => Ok(QueryKind::V6Summary),
            "prefix" => Ok(QueryKind::Prefix),
            "v6_prefix" => Ok(QueryKind::V6Prefix),
            "regex" => Ok(QueryKind::Regex),
            other => Err(QueryError::UnsupportedKind(other.to_string())),
        }
    }
}

/// One element of the JSON array the query endpoint returns.
///
/// The wire shape is `[{"nonce": "...", "status": "...", "result": "..."}]`;
/// the echoed nonce is not used.
#[derive(Debug, Deserialize)]
struct QueryResponse {
    status: String,
    result: String,
}

/// Client for the looking glass query endpoint.
pub struct QueryClient {
    fetcher: Arc<dyn TextFetcher>,
    query_url: Url,
}

impl QueryClient {
    /// Creates a client that sends queries to `query_url` via `fetcher`.
    pub fn new(fetcher: Arc<dyn TextFetcher>, query_url: Url) -> Self {
        Self { fetcher, query_url }
    }

    /// Executes one query against one router.
    ///
    /// Generates a fresh nonce pair, performs the authenticated GET and
    /// unwraps the JSON envelope. Returns `None` on transport failure, a
    /// malformed response or a non-`good` status; `Some("")` when the
    /// router reported no usable data; `Some(text)` otherwise.
    pub async fn query(&self, kind: QueryKind, args: &str, router_id: &str) -> Option<String> {
        info!(
            "query: {} args: {args:?} router_id: {router_id}",
            kind.as_str()
        );

        let nonces = NoncePair::generate();
        let params = vec![
            ("query".to_string(), kind.as_str().to_string()),
            ("args".to_string(), args.to_string()),
            ("router".to_string(), router_id.to_string()),
            ("pch_nonce".to_string(), nonces.query_nonce().to_string()),
        ];
        let cookie = nonces.cookie_header();

        let body = match self
            .fetcher
            .fetch_text(self.query_url.as_str(), &params, Some(&cookie))
            .await
        {
            Ok(body) => body,
            Err(e) => {
                error!("Query for router {router_id} failed: {e}");
                return None;
            }
        };

        let responses: Vec<QueryResponse> = match serde_json::from_str(&body) {
            Ok(responses) => responses,
            Err(e) => {
                error!("Unexpected query response shape: {e}");
                return None;
            }
        };
        let Some(response) = responses.into_iter().next() else {
            error!("Query response array is empty");
            return None;
        };

        if response.status != "good" {
            error!("Response status: {}", response.status);
            return None;
        }

        let result = response.result;
        if result == ROUTER_OFFLINE_SENTINEL {
            warn!("Router {router_id} not available");
            return Some(String::new());
        }
        if kind.expects_summary_output() && !result.contains(SUMMARY_MARKER) {
            warn!("Response result: {}", result.trim());
            return Some(String::new());
        }

        Some(result)
    }

    /// Like [`QueryClient::query`], with the kind given as free text.
    ///
    /// An unsupported kind is rejected locally: logged and answered with
    /// `None` before any network call is made.
    pub async fn query_named(&self, kind: &str, args: &str, router_id: &str) -> Option<String> {
        match kind.parse::<QueryKind>() {
            Ok(kind) => self.query(kind, args, router_id).await,
            Err(e) => {
                error!("{e}");
                None
            }
        }
    }

    /// Fetches the BGP summary of a router for an IP version.
    pub async fn query_summary(&self, router_id: &str, ip_version: IpVersion) -> Option<String> {
        self.query(QueryKind::summary_for(ip_version), "", router_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockFetcher;
    use strum::IntoEnumIterator;

    fn client(fetcher: Arc<MockFetcher>) -> QueryClient {
        QueryClient::new(
            fetcher,
            Url::parse("https://lg.example/tools/looking_glass_query").expect("test url"),
        )
    }

    fn good_response(result: &str) -> String {
        serde_json::json!([{"nonce": "1234", "status": "good", "result": result}]).to_string()
    }

    const SUMMARY_RESULT: &str =
        "BGP router identifier 203.0.113.1, local AS number 65000<br />\nRIB entries 120000";

    #[test]
    fn test_query_kind_wire_names() {
        for kind in QueryKind::iter() {
            // every wire name round-trips through FromStr
            assert_eq!(kind.as_str().parse::<QueryKind>(), Ok(kind));
        }
        assert_eq!(QueryKind::V6Summary.as_str(), "v6_summary");
    }

    #[test]
    fn test_summary_kind_for_ip_version() {
        assert_eq!(QueryKind::summary_for(IpVersion::Ipv4), QueryKind::Summary);
        assert_eq!(
            QueryKind::summary_for(IpVersion::Ipv6),
            QueryKind::V6Summary
        );
    }

    #[tokio::test]
    async fn test_unknown_kind_rejected_without_network_call() {
        let fetcher = Arc::new(MockFetcher::with_responses(vec![]));
        let result = client(Arc::clone(&fetcher))
            .query_named("bogus", "", "4")
            .await;
        assert_eq!(result, None);
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_query_sends_nonce_pair() {
        let fetcher = Arc::new(MockFetcher::with_responses(vec![Ok(good_response(
            SUMMARY_RESULT,
        ))]));
        let result = client(Arc::clone(&fetcher))
            .query(QueryKind::Summary, "", "4")
            .await;
        assert_eq!(result, Some(SUMMARY_RESULT.to_string()));

        let requests = fetcher.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];

        let param = |name: &str| {
            request
                .params
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.clone())
                .expect("param present")
        };
        assert_eq!(param("query"), "summary");
        assert_eq!(param("router"), "4");

        // The query nonce appears both as the parameter and in the cookie;
        // the cookie carries a second, independent nonce alongside it.
        let query_nonce = param("pch_nonce");
        assert_eq!(query_nonce.len(), 100);
        let cookie = request.cookie.clone().expect("cookie header present");
        assert!(cookie.contains(&format!("pch_nonce{query_nonce}={query_nonce}")));
        let assignments: Vec<&str> = cookie.split("; ").collect();
        assert_eq!(assignments.len(), 2);
        assert_ne!(assignments[0], assignments[1]);
    }

    #[tokio::test]
    async fn test_bad_status_is_hard_none() {
        let body =
            serde_json::json!([{"nonce": "1", "status": "bad nonce", "result": "x"}]).to_string();
        let fetcher = Arc::new(MockFetcher::with_responses(vec![Ok(body)]));
        let result = client(fetcher).query(QueryKind::Summary, "", "4").await;
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_offline_router_is_degraded_empty() {
        let fetcher = Arc::new(MockFetcher::with_responses(vec![Ok(good_response("NA"))]));
        let result = client(fetcher).query(QueryKind::Summary, "", "4").await;
        assert_eq!(result, Some(String::new()));
    }

    #[tokio::test]
    async fn test_summary_without_marker_is_degraded_empty() {
        let fetcher = Arc::new(MockFetcher::with_responses(vec![Ok(good_response(
            "temporarily unable to run queries",
        ))]));
        let result = client(fetcher).query(QueryKind::Summary, "", "4").await;
        assert_eq!(result, Some(String::new()));
    }

    #[tokio::test]
    async fn test_non_summary_kind_skips_marker_check() {
        let fetcher = Arc::new(MockFetcher::with_responses(vec![Ok(good_response(
            "192.0.2.0/24 via 203.0.113.7",
        ))]));
        let result = client(fetcher)
            .query(QueryKind::Prefix, "192.0.2.0/24", "4")
            .await;
        assert_eq!(result, Some("192.0.2.0/24 via 203.0.113.7".to_string()));
    }

    #[tokio::test]
    async fn test_transport_failure_is_hard_none() {
        let fetcher = Arc::new(MockFetcher::with_responses(vec![Err(
            MockFetcher::unavailable("https://lg.example/tools/looking_glass_query"),
        )]));
        let result = client(fetcher).query(QueryKind::Summary, "", "4").await;
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_malformed_json_is_hard_none() {
        let fetcher = Arc::new(MockFetcher::with_responses(vec![Ok(
            "<html>maintenance</html>".to_string(),
        )]));
        let result = client(fetcher).query(QueryKind::Summary, "", "4").await;
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_query_summary_maps_ip_version() {
        let fetcher = Arc::new(MockFetcher::with_responses(vec![Ok(good_response(
            SUMMARY_RESULT,
        ))]));
        client(Arc::clone(&fetcher))
            .query_summary("4", IpVersion::Ipv6)
            .await;
        let requests = fetcher.requests();
        assert!(requests[0]
            .params
            .contains(&("query".to_string(), "v6_summary".to_string())));
    }
}
