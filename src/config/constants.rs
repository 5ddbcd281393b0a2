//! Configuration constants.
//!
//! Endpoint locations, protocol constants and default file locations used
//! as CLI defaults.

/// Base URL of the looking glass service.
pub const DEFAULT_BASE_URL: &str = "https://www.pch.net";

/// Path of the directory page holding the router select widgets.
pub const DIRECTORY_PATH: &str = "/tools/looking_glass";

/// Path of the query endpoint. Accepts its parameters via GET and returns a
/// single-element JSON array of `{nonce, status, result}`.
pub const QUERY_PATH: &str = "/tools/looking_glass_query";

/// Number of decimal digits in a generated nonce.
pub const NONCE_LENGTH: usize = 100;

/// Marker substring every usable summary result contains. A "good" response
/// without it is some other kind of output (an error page, a notice) and is
/// treated as no usable data.
pub const SUMMARY_MARKER: &str = "BGP router identifier";

/// Result sentinel the service returns when the router itself is offline.
pub const ROUTER_OFFLINE_SENTINEL: &str = "NA";

/// Lower bound of the randomized pause between router polls, in seconds.
/// The pause is politeness toward the remote service, not a tunable.
pub const POLL_SLEEP_MIN_SECS: u64 = 10;

/// Upper bound of the randomized pause between router polls, in seconds.
pub const POLL_SLEEP_MAX_SECS: u64 = 20;

/// Default location of the router directory cache file.
pub const DEFAULT_CACHE_FILE: &str = "./ixp_routers.json";

/// Default directory for per-router JSON summary files.
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Default SQLite database path.
pub const DEFAULT_DB_PATH: &str = "./ixp-info.db";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// User-Agent identifying this tool to the remote service.
pub const DEFAULT_USER_AGENT: &str = concat!("pch_looking_glass/", env!("CARGO_PKG_VERSION"));
