//! SQLite-backed batch writer.

use async_trait::async_trait;
use log::debug;
use sqlx::SqlitePool;

use crate::error_handling::WriteError;
use crate::queue::{BatchWriter, Record, WriteOutcome};

/// Stores each batch in the `entries` table inside a single transaction.
///
/// A failing insert rolls back the whole batch, so a batch is either fully
/// stored or not stored at all.
#[derive(Clone)]
pub struct SqliteBatchWriter {
    pool: SqlitePool,
}

impl SqliteBatchWriter {
    /// Creates a writer over an already migrated pool.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteBatchWriter { pool }
    }
}

#[async_trait]
impl BatchWriter for SqliteBatchWriter {
    async fn write(
        &self,
        target: &str,
        records: Vec<Record>,
    ) -> Result<Vec<WriteOutcome>, WriteError> {
        let created_at_ms = chrono::Utc::now().timestamp_millis();
        let mut tx = self.pool.begin().await?;
        let mut outcomes = Vec::with_capacity(records.len());

        for record in &records {
            let body = serde_json::to_string(record)?;
            let id = sqlx::query(
                "INSERT INTO entries (target, body, created_at_ms) VALUES (?, ?, ?)",
            )
            .bind(target)
            .bind(&body)
            .bind(created_at_ms)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();

            outcomes.push(WriteOutcome {
                id: id.to_string(),
                ok: true,
            });
        }

        tx.commit().await?;
        debug!("Stored {} records under '{}'", outcomes.len(), target);
        Ok(outcomes)
    }
}
