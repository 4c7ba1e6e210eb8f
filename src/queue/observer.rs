//! Progress observer abstraction.

use crate::error_handling::WriteError;

/// Receives progress, completion and error notifications from an
/// [`EntryBatchQueue`](super::EntryBatchQueue).
///
/// Callbacks are called without any queue lock held, so an implementation may
/// query the queue. They are never called concurrently: notifications are
/// delivered one at a time in the order the queue decided them, so the
/// persisted counts reported by concurrently finishing batches never go
/// backwards and `on_complete` follows the progress that led to it. On a
/// multi-thread runtime a notification may be delivered by the task draining
/// the queue at that moment rather than by the caller that caused it.
pub trait ProgressObserver: Send + Sync {
    /// Called after every `add` and after every successful batch write.
    fn on_progress(&self, percent: u32, message: &str);

    /// Called once per session when persisting has finished or was aborted.
    fn on_complete(&self, message: &str);

    /// Called with the first write failure of a session.
    fn on_error(&self, error: &WriteError);
}

/// Observer that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {
    fn on_progress(&self, _percent: u32, _message: &str) {}

    fn on_complete(&self, _message: &str) {}

    fn on_error(&self, _error: &WriteError) {}
}
