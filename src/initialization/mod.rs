//! Application initialization.
//!
//! Currently this is logger setup; the database pool is opened by
//! [`crate::storage`] where it is needed.

mod logger;

// Re-export public API
pub use logger::init_logger_with;
