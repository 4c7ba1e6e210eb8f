//! Error type definitions.
//!
//! This module defines all error types used throughout the application.

use log::SetLoggerError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Error types for database operations.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum DatabaseError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),

    /// Schema migration error.
    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
}

/// Errors raised synchronously by the entry queue.
///
/// Both variants indicate a programming error on the caller's side and are
/// never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// `add` was called after `complete` locked the queue.
    #[error("entry queue is locked: no further records can be queued after completion")]
    Locked,

    /// The queue was constructed with a batch size of zero.
    #[error("batch size must be greater than 0")]
    InvalidBatchSize,
}

/// A failed batch write.
///
/// Any error returned by a [`crate::BatchWriter`] counts as a failure of the
/// whole batch. The display form is what observers see in the abort message.
#[derive(Error, Debug)]
pub enum WriteError {
    /// The backing database rejected the batch.
    #[error("database write failed: {0}")]
    Database(#[from] sqlx::Error),

    /// A record could not be serialized for storage.
    #[error("record serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The writer rejected the batch with a raw reason.
    #[error("{0}")]
    Rejected(String),
}

/// Errors reading input records.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The input file could not be read.
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV.
    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A JSON document did not have the expected shape.
    #[error("{location} is not a JSON object")]
    NotAnObject {
        /// Human-readable position of the offending value (e.g. "element 3", "line 7").
        location: String,
    },

    /// Two CSV columns share a header name, so one would overwrite the other.
    #[error("CSV header '{0}' appears more than once")]
    DuplicateHeader(String),

    /// The input format could not be inferred from the file name.
    #[error("cannot infer input format from '{0}' (expected .csv, .json, .jsonl or .ndjson; use --format)")]
    UnknownFormat(String),
}

/// A single configuration value that failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid value for '{field}': {message}")]
pub struct ConfigValidationError {
    /// Name of the offending field.
    pub field: String,
    /// What is wrong and what would be accepted.
    pub message: String,
}

impl ConfigValidationError {
    pub(crate) fn new(field: &str, message: impl Into<String>) -> Self {
        ConfigValidationError {
            field: field.to_string(),
            message: message.into(),
        }
    }
}
