//! Error handling.
//!
//! This module provides the error types for each layer of the application:
//! - **Queue errors**: misuse of the entry queue (adding after completion)
//! - **Write errors**: failed batch writes, surfaced to progress observers
//! - **Database / source / initialization errors**: setup and I/O failures
//! - **Config validation errors**: field-specific, actionable messages

mod types;

// Re-export public API
pub use types::{
    ConfigValidationError, DatabaseError, InitializationError, QueueError, SourceError,
    WriteError,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_write_error_displays_raw_reason() {
        let err = WriteError::Rejected("DB error".to_string());
        assert_eq!(err.to_string(), "DB error");
    }

    #[test]
    fn test_locked_queue_error_message() {
        let msg = QueueError::Locked.to_string();
        assert!(msg.contains("locked"), "Message should say the queue is locked: {msg}");
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = ConfigValidationError::new("batch_size", "must be greater than 0");
        assert_eq!(err.field, "batch_size");
        assert_eq!(
            err.to_string(),
            "invalid value for 'batch_size': must be greater than 0"
        );
    }

    #[test]
    fn test_not_an_object_names_location() {
        let err = SourceError::NotAnObject {
            location: "line 7".to_string(),
        };
        assert_eq!(err.to_string(), "line 7 is not a JSON object");
    }
}
