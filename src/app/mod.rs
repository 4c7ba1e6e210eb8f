//! Main application modules.
//!
//! This module provides the import driver and the log-based progress
//! observer used by the CLI.

pub mod import;
pub mod logging;

// Re-export public API
pub use import::{feed_queue, run_import, ImportReport};
pub use logging::LogObserver;
