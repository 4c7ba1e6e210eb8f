//! Import driver: source file → queue → store.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use log::{info, warn};

use crate::app::logging::LogObserver;
use crate::config::Config;
use crate::error_handling::QueueError;
use crate::queue::{EntryBatchQueue, QueueConfig, Record};
use crate::source::read_records;
use crate::storage::{init_db_pool_with_path, SqliteBatchWriter};

/// Results of an import run.
#[derive(Debug, Clone)]
pub struct ImportReport {
    /// Records accepted by the queue
    pub posted: usize,
    /// Records whose batch was written
    pub persisted: usize,
    /// Whether a batch write failed
    pub aborted: bool,
    /// Completion message reported by the queue
    pub completion_message: Option<String>,
    /// First write error, if the import was aborted
    pub error: Option<String>,
    /// Target label the records were stored under
    pub target: String,
    /// Path to the SQLite database
    pub db_path: PathBuf,
    /// Elapsed time in seconds
    pub elapsed_seconds: f64,
}

/// Reads `config.file` and persists its records into `config.db_path`.
///
/// # Errors
///
/// Fails if the configuration is invalid, the input cannot be read or
/// parsed, or the database cannot be opened. A failed batch write is not an
/// error here; it is reported through `ImportReport::aborted`.
pub async fn run_import(config: Config) -> Result<ImportReport> {
    config.validate().context("Invalid configuration")?;
    let start_time = Instant::now();

    let records = read_records(&config.file, config.format)
        .with_context(|| format!("Failed to read records from {}", config.file.display()))?;
    info!(
        "Read {} records from {}",
        records.len(),
        config.file.display()
    );

    let pool = init_db_pool_with_path(&config.db_path)
        .await
        .context("Failed to initialize database pool")?;

    let observer = Arc::new(LogObserver::new());
    let queue = EntryBatchQueue::new(
        QueueConfig {
            target_label: config.target.clone(),
            batch_size: config.batch_size,
        },
        Arc::new(SqliteBatchWriter::new(pool.clone())),
        observer.clone(),
    )?;

    feed_queue(&queue, records, config.chunk_size, config.flush_remaining).await?;
    let snapshot = queue.snapshot();
    pool.close().await;

    Ok(ImportReport {
        posted: snapshot.posted,
        persisted: snapshot.successful,
        aborted: snapshot.aborted,
        completion_message: observer.completion_message(),
        error: observer.error_message(),
        target: config.target,
        db_path: config.db_path,
        elapsed_seconds: start_time.elapsed().as_secs_f64(),
    })
}

/// Hands `records` to `queue` in chunks of `chunk_size`, completes it and
/// waits for every batch to settle.
///
/// Feeding stops early once a write failure has aborted the session.
pub async fn feed_queue(
    queue: &EntryBatchQueue,
    records: Vec<Record>,
    chunk_size: usize,
    flush_remaining: bool,
) -> Result<(), QueueError> {
    let chunk_size = chunk_size.max(1);
    let mut records = records.into_iter();

    loop {
        let chunk: Vec<Record> = records.by_ref().take(chunk_size).collect();
        if chunk.is_empty() {
            break;
        }
        match queue.add(chunk) {
            Ok(()) => {}
            Err(QueueError::Locked) if queue.snapshot().aborted => {
                warn!("Persisting was aborted, skipping the remaining input");
                break;
            }
            Err(e) => return Err(e),
        }
        // Let dispatched batches make progress between chunks.
        tokio::task::yield_now().await;
    }

    queue.complete(flush_remaining);
    queue.settled().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{count_entries, init_memory_pool};
    use serde_json::json;

    fn rows(n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| {
                let mut r = Record::new();
                r.insert("row".to_string(), json!(i));
                r
            })
            .collect()
    }

    async fn memory_queue(batch_size: usize) -> (EntryBatchQueue, sqlx::SqlitePool) {
        let pool = init_memory_pool().await.unwrap();
        let queue = EntryBatchQueue::new(
            QueueConfig {
                target_label: "sales".to_string(),
                batch_size,
            },
            Arc::new(SqliteBatchWriter::new(pool.clone())),
            Arc::new(LogObserver::new()),
        )
        .unwrap();
        (queue, pool)
    }

    #[tokio::test]
    async fn test_feed_queue_persists_everything_with_flush() {
        let (queue, pool) = memory_queue(4).await;

        feed_queue(&queue, rows(23), 5, true).await.unwrap();

        assert!(queue.is_complete());
        assert_eq!(queue.snapshot().successful, 23);
        assert_eq!(count_entries(&pool, "sales").await.unwrap(), 23);
    }

    #[tokio::test]
    async fn test_feed_queue_without_flush_drops_remainder() {
        let (queue, pool) = memory_queue(4).await;

        feed_queue(&queue, rows(23), 5, false).await.unwrap();

        assert_eq!(queue.snapshot().successful, 20);
        assert_eq!(queue.snapshot().queued, 3);
        assert_eq!(count_entries(&pool, "sales").await.unwrap(), 20);
    }

    #[tokio::test]
    async fn test_feed_queue_with_no_records_completes() {
        let (queue, _pool) = memory_queue(4).await;

        feed_queue(&queue, Vec::new(), 5, true).await.unwrap();

        assert!(queue.is_complete());
        assert_eq!(queue.snapshot().posted, 0);
    }

    #[tokio::test]
    async fn test_feed_queue_on_locked_queue_is_an_error() {
        let (queue, _pool) = memory_queue(4).await;
        queue.complete(false);

        let result = feed_queue(&queue, rows(3), 5, true).await;
        assert_eq!(result, Err(QueueError::Locked));
    }

    #[tokio::test]
    async fn test_feed_queue_stops_after_abort() {
        let (queue, pool) = memory_queue(2).await;
        sqlx::query("DROP TABLE entries")
            .execute(&pool)
            .await
            .unwrap();

        feed_queue(&queue, rows(10), 2, true).await.unwrap();

        let snapshot = queue.snapshot();
        assert!(snapshot.aborted);
        assert!(queue.is_complete());
        assert_eq!(snapshot.successful, 0);
        assert_eq!(snapshot.in_flight, 0);
    }
}
