//! Configuration types and CLI options.
//!
//! This module defines the enums and the `Config` struct used for
//! command-line argument parsing. Every option can also be constructed
//! programmatically for library use.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_BASE_URL, DEFAULT_CACHE_FILE, DEFAULT_DATA_DIR, DEFAULT_DB_PATH, DEFAULT_TIMEOUT_SECS,
    DEFAULT_USER_AGENT,
};
use crate::models::IpVersion;

/// Logging level for the application.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Persistence backends that can record router summaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    /// One JSON file per router/IP-version combination
    JsonFile,
    /// Embedded SQLite database
    Sqlite,
    /// PostgreSQL server
    Postgres,
}

/// Application configuration.
///
/// Presence of `--ixp`, `--ixp-city` and `--ixp-country` together selects
/// single-router mode; their absence selects all-router polling mode.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "pch_looking_glass",
    version,
    about = "Polls the PCH looking glass for IXP router summaries and records them"
)]
pub struct Config {
    /// IXP name for single-router mode
    #[arg(long, env = "IXP")]
    pub ixp: Option<String>,

    /// City of the IXP for single-router mode
    #[arg(long, env = "IXP_CITY")]
    pub ixp_city: Option<String>,

    /// Country of the IXP for single-router mode
    #[arg(long, env = "IXP_COUNTRY")]
    pub ixp_country: Option<String>,

    /// IP version of the summaries to fetch
    #[arg(long, value_enum, env = "IXP_IP_VERSION", default_value = "ipv4")]
    pub ip_version: IpVersion,

    /// Base URL of the looking glass service
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Router directory cache file
    #[arg(long, default_value = DEFAULT_CACHE_FILE)]
    pub cache_file: PathBuf,

    /// Refetch the router directory even if the cache file exists
    #[arg(long)]
    pub force_refresh: bool,

    /// Persistence backends to record summaries in
    #[arg(long, value_enum, value_delimiter = ',', default_values = ["json-file", "sqlite"])]
    pub stores: Vec<StoreKind>,

    /// Directory for per-router JSON summary files
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// SQLite database path
    #[arg(long, default_value = DEFAULT_DB_PATH)]
    pub db_path: PathBuf,

    /// PostgreSQL connection URL (required by the postgres store)
    #[arg(long, env = "PCH_POSTGRES_URL")]
    pub postgres_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Log level
    #[arg(long, value_enum, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value = "plain")]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ixp: None,
            ixp_city: None,
            ixp_country: None,
            ip_version: IpVersion::Ipv4,
            base_url: DEFAULT_BASE_URL.to_string(),
            cache_file: PathBuf::from(DEFAULT_CACHE_FILE),
            force_refresh: false,
            stores: vec![StoreKind::JsonFile, StoreKind::Sqlite],
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            postgres_url: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

impl Config {
    /// Returns the single-router identity triple when all three parts are set.
    pub fn single_router(&self) -> Option<(&str, &str, &str)> {
        match (&self.ixp, &self.ixp_city, &self.ixp_country) {
            (Some(ixp), Some(city), Some(country)) => Some((ixp, city, country)),
            _ => None,
        }
    }

    /// True when some but not all of the identity triple parts are set.
    pub fn partial_router_selection(&self) -> bool {
        let set = [
            self.ixp.is_some(),
            self.ixp_city.is_some(),
            self.ixp_country.is_some(),
        ];
        set.iter().any(|s| *s) && !set.iter().all(|s| *s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_config_default_is_all_router_mode() {
        let config = Config::default();
        assert!(config.single_router().is_none());
        assert!(!config.partial_router_selection());
        assert_eq!(config.stores, vec![StoreKind::JsonFile, StoreKind::Sqlite]);
        assert_eq!(config.timeout_seconds, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_single_router_requires_full_triple() {
        let config = Config {
            ixp: Some("BeirutIX".to_string()),
            ixp_city: Some("Beirut".to_string()),
            ixp_country: Some("Lebanon".to_string()),
            ..Config::default()
        };
        assert_eq!(
            config.single_router(),
            Some(("BeirutIX", "Beirut", "Lebanon"))
        );
        assert!(!config.partial_router_selection());
    }

    #[test]
    fn test_partial_triple_is_flagged() {
        let config = Config {
            ixp: Some("BeirutIX".to_string()),
            ..Config::default()
        };
        assert!(config.single_router().is_none());
        assert!(config.partial_router_selection());
    }

    #[test]
    fn test_cli_parsing_round_trip() {
        let config = Config::parse_from([
            "pch_looking_glass",
            "--ixp",
            "LINX",
            "--ixp-city",
            "London",
            "--ixp-country",
            "United Kingdom",
            "--ip-version",
            "ipv6",
            "--stores",
            "sqlite,postgres",
            "--postgres-url",
            "postgres://ixp@localhost/ixp",
        ]);
        assert_eq!(
            config.single_router(),
            Some(("LINX", "London", "United Kingdom"))
        );
        assert_eq!(config.ip_version, IpVersion::Ipv6);
        assert_eq!(config.stores, vec![StoreKind::Sqlite, StoreKind::Postgres]);
    }
}
