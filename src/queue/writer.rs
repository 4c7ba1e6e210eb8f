//! Batch writer abstraction.

use async_trait::async_trait;
use serde::Serialize;

use crate::error_handling::WriteError;

use super::Record;

/// Per-record result reported by a writer.
///
/// The queue never inspects these; a batch counts as written when
/// [`BatchWriter::write`] returns `Ok`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteOutcome {
    /// Identifier the store assigned to the record
    pub id: String,
    /// Whether the store accepted this record
    pub ok: bool,
}

/// Durable storage for batches of records.
///
/// Any `Err` is treated as a failure of the whole batch.
#[async_trait]
pub trait BatchWriter: Send + Sync {
    /// Stores `records` under `target`.
    async fn write(&self, target: &str, records: Vec<Record>)
        -> Result<Vec<WriteOutcome>, WriteError>;
}
