//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `entry_persister` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use entry_persister::initialization::init_logger_with;
use entry_persister::{run_import, Config, Opt};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from(Opt::parse());

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    match run_import(config).await {
        Ok(report) if report.aborted => {
            eprintln!(
                "entry_persister: {}",
                report
                    .completion_message
                    .as_deref()
                    .unwrap_or("data persisting aborted")
            );
            eprintln!(
                "{} of {} record{} persisted under '{}' before the failure",
                report.persisted,
                report.posted,
                if report.posted == 1 { "" } else { "s" },
                report.target
            );
            process::exit(1);
        }
        Ok(report) => {
            println!(
                "Persisted {} of {} record{} under '{}' in {:.1}s",
                report.persisted,
                report.posted,
                if report.posted == 1 { "" } else { "s" },
                report.target,
                report.elapsed_seconds
            );
            println!("Results saved in {}", report.db_path.display());
            Ok(())
        }
        Err(e) => {
            eprintln!("entry_persister error: {:#}", e);
            process::exit(1);
        }
    }
}
