//! Error handling.
//!
//! This module provides the error type definitions used throughout the
//! application. The taxonomy follows how the client recovers:
//! - **Network / directory / storage** failures are recoverable and logged;
//!   the caller proceeds with the next unit of work
//! - **Validation** failures are rejected before any network call
//! - **NotFound** ends a single-router run without being a crash

mod types;

// Re-export public API
pub use types::{
    DirectoryError, FetchError, InitializationError, PollError, QueryError, StorageError,
    SummaryParseError,
};
