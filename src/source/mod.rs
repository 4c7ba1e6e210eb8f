//! Input readers.
//!
//! Turns CSV, JSON and JSON Lines files into [`Record`]s for the queue.
//! The format is taken from the file extension unless given explicitly.

mod csv;
mod json;

use std::path::Path;

use clap::ValueEnum;

use crate::error_handling::SourceError;
use crate::queue::Record;

pub use self::csv::parse_csv;
pub use self::json::{parse_json, parse_jsonl};

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// Comma-separated values with a header row
    Csv,
    /// A JSON array of objects
    Json,
    /// One JSON object per line
    Jsonl,
}

impl InputFormat {
    /// Infers the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match extension.as_deref() {
            Some("csv") => Ok(InputFormat::Csv),
            Some("json") => Ok(InputFormat::Json),
            Some("jsonl") | Some("ndjson") => Ok(InputFormat::Jsonl),
            _ => Err(SourceError::UnknownFormat(path.display().to_string())),
        }
    }
}

/// Reads every record from `path`.
///
/// `format` overrides extension-based detection.
pub fn read_records(path: &Path, format: Option<InputFormat>) -> Result<Vec<Record>, SourceError> {
    let format = match format {
        Some(format) => format,
        None => InputFormat::from_path(path)?,
    };
    let content = std::fs::read_to_string(path)?;
    log::debug!("Parsing {} as {:?}", path.display(), format);

    match format {
        InputFormat::Csv => parse_csv(content.as_bytes()),
        InputFormat::Json => parse_json(&content),
        InputFormat::Jsonl => parse_jsonl(&content),
    }
}
