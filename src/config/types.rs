//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_CHUNK_SIZE, DEFAULT_DB_PATH, DEFAULT_TARGET, MAX_BATCH_SIZE,
};
use crate::error_handling::ConfigValidationError;
use crate::source::InputFormat;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
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
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Library configuration (no CLI dependencies).
///
/// This is the core configuration struct used by the library. It can be
/// constructed programmatically without any CLI dependencies.
///
/// # Examples
///
/// ```no_run
/// use entry_persister::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     file: PathBuf::from("sales.csv"),
///     target: "sales".to_string(),
///     batch_size: 250,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// File to read records from
    pub file: PathBuf,

    /// Input format; inferred from the file extension when `None`
    pub format: Option<InputFormat>,

    /// Target label (collection) the records are stored under
    pub target: String,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Database path (SQLite file)
    pub db_path: PathBuf,

    /// Records per batch write
    pub batch_size: usize,

    /// Records handed to the queue per `add` call
    pub chunk_size: usize,

    /// Write the final partial batch when the input is exhausted
    pub flush_remaining: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file: PathBuf::from("data.csv"),
            format: None,
            target: DEFAULT_TARGET.to_string(),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            batch_size: DEFAULT_BATCH_SIZE,
            chunk_size: DEFAULT_CHUNK_SIZE,
            flush_remaining: true,
        }
    }
}

impl Config {
    /// Checks that every value is usable before any work starts.
    ///
    /// Returns the first offending field with an actionable message.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.batch_size == 0 {
            return Err(ConfigValidationError::new(
                "batch_size",
                "must be greater than 0",
            ));
        }
        if self.batch_size > MAX_BATCH_SIZE {
            return Err(ConfigValidationError::new(
                "batch_size",
                format!("must be at most {MAX_BATCH_SIZE}"),
            ));
        }
        if self.chunk_size == 0 {
            return Err(ConfigValidationError::new(
                "chunk_size",
                "must be greater than 0",
            ));
        }
        if self.target.trim().is_empty() {
            return Err(ConfigValidationError::new(
                "target",
                "must not be empty (e.g. --target sales)",
            ));
        }
        Ok(())
    }
}

/// Command-line options.
///
/// This struct is automatically generated by `clap` from the field attributes.
/// All options have sensible defaults and can be overridden via command-line flags.
///
/// # Examples
///
/// ```bash
/// # Basic usage
/// entry_persister sales.csv
///
/// # Custom target and batch size
/// entry_persister sales.json --target sales --batch-size 500
///
/// # Keep the trailing partial batch out of the store
/// entry_persister sales.csv --no-flush
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "entry_persister",
    about = "Loads CSV/JSON records and persists them in batches into a SQLite document store."
)]
pub struct Opt {
    /// File to read
    #[arg(value_parser)]
    pub file: PathBuf,

    /// Input format: csv|json|jsonl (default: inferred from the file extension)
    #[arg(long, value_enum)]
    pub format: Option<InputFormat>,

    /// Target label the records are stored under
    #[arg(long, default_value = DEFAULT_TARGET)]
    pub target: String,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Database path (SQLite file)
    #[arg(long, value_parser, default_value = DEFAULT_DB_PATH)]
    pub db_path: PathBuf,

    /// Records per batch write
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Records handed to the queue at a time
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Do not write the final partial batch
    #[arg(long)]
    pub no_flush: bool,
}

impl From<Opt> for Config {
    fn from(opt: Opt) -> Self {
        Config {
            file: opt.file,
            format: opt.format,
            target: opt.target,
            log_level: opt.log_level,
            log_format: opt.log_format,
            db_path: opt.db_path,
            batch_size: opt.batch_size,
            chunk_size: opt.chunk_size,
            flush_remaining: !opt.no_flush,
        }
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
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_batch_size() {
        let config = Config {
            batch_size: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.field, "batch_size");
        assert!(err.message.contains("greater than 0"));
    }

    #[test]
    fn test_validate_rejects_oversized_batch() {
        let config = Config {
            batch_size: MAX_BATCH_SIZE + 1,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.field, "batch_size");
        assert!(err.message.contains(&MAX_BATCH_SIZE.to_string()));
    }

    #[test]
    fn test_validate_rejects_blank_target() {
        let config = Config {
            target: "   ".to_string(),
            ..Default::default()
        };
        assert_eq!(config.validate().unwrap_err().field, "target");
    }

    #[test]
    fn test_validate_rejects_zero_chunk_size() {
        let config = Config {
            chunk_size: 0,
            ..Default::default()
        };
        assert_eq!(config.validate().unwrap_err().field, "chunk_size");
    }

    #[test]
    fn test_opt_parsing_defaults() {
        let opt = Opt::parse_from(["entry_persister", "sales.csv"]);
        let config = Config::from(opt);
        assert_eq!(config.file, PathBuf::from("sales.csv"));
        assert_eq!(config.target, DEFAULT_TARGET);
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
        assert!(config.flush_remaining);
        assert!(config.format.is_none());
    }

    #[test]
    fn test_opt_parsing_overrides() {
        let opt = Opt::parse_from([
            "entry_persister",
            "sales.txt",
            "--format",
            "jsonl",
            "--target",
            "sales",
            "--batch-size",
            "4",
            "--no-flush",
        ]);
        let config = Config::from(opt);
        assert_eq!(config.format, Some(InputFormat::Jsonl));
        assert_eq!(config.target, "sales");
        assert_eq!(config.batch_size, 4);
        assert!(!config.flush_remaining);
    }
}
