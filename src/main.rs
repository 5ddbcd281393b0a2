//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `pch_looking_glass` library that
//! handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Ctrl-C wiring
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;
use tokio_util::sync::CancellationToken;

use pch_looking_glass::{init_logger_with, run_poll, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists); this allows
    // setting PCH_POSTGRES_URL without exporting it manually
    let _ = dotenvy::dotenv();

    // Parse command-line arguments into Config
    let config = Config::parse();

    // Initialize logger based on config
    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    // A polling run over the full directory takes minutes; Ctrl-C stops it
    // between routers instead of mid-write
    let cancel = CancellationToken::new();
    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("Interrupt received, finishing the current router");
            ctrl_c_cancel.cancel();
        }
    });

    // Run the poll using the library
    match run_poll(config, cancel).await {
        Ok(report) => {
            // Print user-friendly summary
            println!(
                "✅ Polled {} router{} ({} persisted, {} degraded, {} failed) in {:.1}s",
                report.total_routers,
                if report.total_routers == 1 { "" } else { "s" },
                report.persisted,
                report.degraded,
                report.failed,
                report.elapsed_seconds
            );
            if report.cancelled {
                println!("Run cancelled before completing all routers");
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("pch_looking_glass error: {:#}", e);
            process::exit(1);
        }
    }
}
