//! Document store backed by SQLite.
//!
//! Records are stored as JSON bodies in a single `entries` table, grouped by
//! target label.

pub mod migrations;
pub mod pool;
pub mod query;
pub mod writer;

// Re-export commonly used items
pub use migrations::run_migrations;
pub use pool::{init_db_pool_with_path, init_memory_pool};
pub use query::{count_entries, fetch_entries, StoredEntry};
pub use writer::SqliteBatchWriter;
