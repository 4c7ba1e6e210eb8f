//! Configuration constants.
//!
//! This module defines the defaults and limits used throughout the application.

/// Number of records written to the store in one batch.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Upper bound for `batch_size`.
/// SQLite handles larger transactions fine, but progress reporting becomes
/// too coarse to be useful beyond this.
pub const MAX_BATCH_SIZE: usize = 10_000;

/// Number of source records handed to the queue per `add` call.
/// Mirrors the chunking of a streamed file reader.
pub const DEFAULT_CHUNK_SIZE: usize = 1_000;

/// Target label used when none is given.
pub const DEFAULT_TARGET: &str = "entries";

/// Default SQLite database path.
pub const DEFAULT_DB_PATH: &str = "./entry_persister.db";

/// Completion message prefix used when a write fails.
pub const ABORT_MESSAGE_PREFIX: &str = "data persisting aborted due to error";
