//! Application initialization and resource setup.
//!
//! This module provides functions to initialize the shared resources:
//! - HTTP fetcher (client with timeout and User-Agent)
//! - Logger
//! - Persistence backends
//!
//! All initialization functions return proper error types for error handling.

mod client;
mod logger;
mod stores;

// Re-export public API
pub use client::init_fetcher;
pub use logger::init_logger_with;
pub use stores::init_stores;
