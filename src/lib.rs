//! entry_persister library: batched persistence of tabular records
//!
//! This library loads records from CSV, JSON or JSON Lines files and persists
//! them into a SQLite-backed document store through [`EntryBatchQueue`], a
//! queue that writes fixed-size batches concurrently and reports progress to
//! a [`ProgressObserver`].
//!
//! # Example
//!
//! ```no_run
//! use entry_persister::{run_import, Config};
//! use std::path::PathBuf;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     file: PathBuf::from("sales.csv"),
//!     target: "sales".to_string(),
//!     batch_size: 250,
//!     ..Default::default()
//! };
//!
//! let report = run_import(config).await?;
//! println!("{} of {} records persisted", report.persisted, report.posted);
//! # Ok(())
//! # }
//! ```
//!
//! The queue can also be used on its own with any [`BatchWriter`]:
//!
//! ```no_run
//! use std::sync::Arc;
//! use entry_persister::{EntryBatchQueue, NoopObserver, QueueConfig, SqliteBatchWriter};
//! use entry_persister::storage::init_memory_pool;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = init_memory_pool().await?;
//! let queue = EntryBatchQueue::new(
//!     QueueConfig { target_label: "sales".to_string(), batch_size: 100 },
//!     Arc::new(SqliteBatchWriter::new(pool)),
//!     Arc::new(NoopObserver),
//! )?;
//! queue.add(Vec::new())?;
//! queue.complete(true);
//! queue.settled().await;
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

mod app;
pub mod config;
mod error_handling;
pub mod initialization;
mod queue;
pub mod source;
pub mod storage;

// Re-export public API
pub use app::{feed_queue, run_import, ImportReport, LogObserver};
pub use config::{Config, LogFormat, LogLevel, Opt};
pub use error_handling::{
    ConfigValidationError, DatabaseError, InitializationError, QueueError, SourceError,
    WriteError,
};
pub use queue::{
    BatchWriter, EntryBatchQueue, NoopObserver, Progress, ProgressObserver, QueueConfig,
    QueueSnapshot, Record, WriteOutcome,
};
pub use source::InputFormat;
pub use storage::SqliteBatchWriter;
