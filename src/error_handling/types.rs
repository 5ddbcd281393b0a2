//! Error type definitions.
//!
//! One enum per failure domain, mirroring how failures propagate: network
//! fetches, directory parsing/caching, summary parsing, query validation,
//! router lookup, storage, and startup wiring.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// Error initializing a persistence backend.
    #[error("Storage initialization error: {0}")]
    StorageError(#[from] StorageError),

    /// The postgres store was selected without a connection URL.
    #[error("The postgres store requires a connection URL (--postgres-url or PCH_POSTGRES_URL)")]
    MissingPostgresUrl,
}

/// Transport-level fetch failures.
///
/// Recoverable by design: callers treat any variant as "no data available
/// now" and carry on.
#[derive(Error, Debug)]
pub enum FetchError {
    /// DNS, connect, timeout or body-read failure.
    #[error("HTTP request error: {0}")]
    Request(#[from] ReqwestError),

    /// The server answered with a non-success status code.
    #[error("HTTP status {status} from {url}")]
    Status {
        /// Status code of the response.
        status: reqwest::StatusCode,
        /// URL the request was sent to.
        url: String,
    },
}

/// Failures obtaining or caching the router directory.
#[derive(Error, Debug)]
pub enum DirectoryError {
    /// The directory page could not be fetched.
    #[error("directory fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// The expected select widget is absent from the page.
    #[error("no select widget with class {class:?} in the directory page")]
    WidgetNotFound {
        /// Class attribute the widget was looked up by.
        class: &'static str,
    },

    /// A CSS selector failed to compile.
    #[error("invalid selector {selector:?}: {message}")]
    Selector {
        /// The selector source text.
        selector: String,
        /// The parser's diagnostic.
        message: String,
    },

    /// The cache file could not be read or written.
    #[error("directory cache I/O error: {0}")]
    CacheIo(#[from] std::io::Error),

    /// The cache file holds malformed JSON.
    #[error("directory cache format error: {0}")]
    CacheFormat(#[from] serde_json::Error),
}

/// Field-level failures extracting numbers from summary text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SummaryParseError {
    /// The label phrase (or its digits) is absent from the text.
    #[error("summary field {field:?} not found")]
    MissingField {
        /// Label phrase of the missing field.
        field: &'static str,
    },

    /// Digits after the label do not fit the field's type.
    #[error("summary field {field:?} has out-of-range value {value:?}")]
    InvalidNumber {
        /// Label phrase of the field.
        field: &'static str,
        /// The digit run that failed to parse.
        value: String,
    },
}

/// Validation failures rejected before any network call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The query kind string is not one the service supports.
    #[error("Query {0:?} is not valid")]
    UnsupportedKind(String),
}

/// Failures that end a polling run.
#[derive(Error, Debug)]
pub enum PollError {
    /// The router directory is currently unobtainable.
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// No router in the directory matches the requested identity triple.
    #[error("no router matches ixp {ixp:?}, city {city:?}, country {country:?}")]
    RouterNotFound {
        /// Requested IXP name.
        ixp: String,
        /// Requested city.
        city: String,
        /// Requested country.
        country: String,
    },
}

/// Persistence backend failures.
///
/// Logged by the orchestrator and never allowed to abort the run over the
/// remaining routers.
#[derive(Error, Debug)]
pub enum StorageError {
    /// SQL execution or connection error.
    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),

    /// Filesystem error from the flat-file store or database file creation.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record serialization error from the flat-file store.
    #[error("record serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_parse_error_display_names_field() {
        let err = SummaryParseError::MissingField {
            field: "RIB entries",
        };
        assert_eq!(err.to_string(), "summary field \"RIB entries\" not found");
    }

    #[test]
    fn test_query_error_display() {
        let err = QueryError::UnsupportedKind("bogus".to_string());
        assert_eq!(err.to_string(), "Query \"bogus\" is not valid");
    }

    #[test]
    fn test_poll_error_not_found_display() {
        let err = PollError::RouterNotFound {
            ixp: "BeirutIX".to_string(),
            city: "Beirut".to_string(),
            country: "Lebanon".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("BeirutIX"));
        assert!(message.contains("Lebanon"));
    }

    #[test]
    fn test_directory_error_wraps_fetch_error() {
        let fetch = FetchError::Status {
            status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            url: "https://www.pch.net/tools/looking_glass".to_string(),
        };
        let err = DirectoryError::from(fetch);
        assert!(matches!(err, DirectoryError::Fetch(_)));
        assert!(err.to_string().contains("503"));
    }
}
