//! Batched, asynchronous entry persistence.
//!
//! [`EntryBatchQueue`] decouples the rate at which records arrive from the
//! batch size the store wants. Records are appended with [`EntryBatchQueue::add`];
//! as soon as `batch_size` records are queued, a batch is handed to the
//! [`BatchWriter`] on its own Tokio task. Several batches may be in flight at
//! once and may resolve in any order, so completion is tracked with counters
//! (`submitted` vs `successful`) rather than by awaiting a chain of futures.
//!
//! Progress, completion and the first write error are reported to a
//! [`ProgressObserver`]. Notifications are decided under the state lock and
//! queued in that order; whichever caller finds nobody else delivering drains
//! the queue, so the observer sees them in lock order from one thread at a time.
//!
//! # Requirements
//!
//! `add` and `complete` spawn tasks and must be called from within a Tokio runtime.

mod observer;
mod state;
mod writer;


use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, error, info, warn};
use tokio::sync::Notify;

use crate::config::ABORT_MESSAGE_PREFIX;
use crate::error_handling::{QueueError, WriteError};

pub use observer::{NoopObserver, ProgressObserver};
pub use state::{Progress, QueueSnapshot};
pub use writer::{BatchWriter, WriteOutcome};

use state::{Notification, QueueState};

/// One unit of data to persist. The queue only counts records.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Static settings of a queue.
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Label passed to the writer with every batch (collection / database name)
    pub target_label: String,
    /// Records per batch; only the final flushed batch may be shorter
    pub batch_size: usize,
}

/// Queue that flushes fixed-size batches to a [`BatchWriter`].
///
/// Cloning is cheap; clones share the same state.
#[derive(Clone)]
pub struct EntryBatchQueue {
    inner: Arc<Inner>,
}

struct Inner {
    target_label: String,
    batch_size: usize,
    writer: Arc<dyn BatchWriter>,
    observer: Arc<dyn ProgressObserver>,
    state: Mutex<QueueState>,
    settled: Notify,
}

impl EntryBatchQueue {
    /// Creates an empty, unlocked queue.
    ///
    /// # Errors
    ///
    /// Returns `QueueError::InvalidBatchSize` if `config.batch_size` is 0.
    pub fn new(
        config: QueueConfig,
        writer: Arc<dyn BatchWriter>,
        observer: Arc<dyn ProgressObserver>,
    ) -> Result<Self, QueueError> {
        if config.batch_size == 0 {
            return Err(QueueError::InvalidBatchSize);
        }
        Ok(EntryBatchQueue {
            inner: Arc::new(Inner {
                target_label: config.target_label,
                batch_size: config.batch_size,
                writer,
                observer,
                state: Mutex::new(QueueState::default()),
                settled: Notify::new(),
            }),
        })
    }

    /// Label batches are written under.
    pub fn target_label(&self) -> &str {
        &self.inner.target_label
    }

    /// Configured batch size.
    pub fn batch_size(&self) -> usize {
        self.inner.batch_size
    }

    /// Queues `records` and dispatches every full batch, oldest records first.
    ///
    /// Returns as soon as the batches are dispatched; it never waits for a
    /// write. The observer receives one progress notification per call, even
    /// for an empty `records`.
    ///
    /// # Errors
    ///
    /// Returns `QueueError::Locked` if `complete` has been called (or a write
    /// failed) in this session. The queue is left unchanged.
    pub fn add(&self, records: Vec<Record>) -> Result<(), QueueError> {
        let (batches, session) = {
            let mut state = self.inner.lock_state();
            if state.locked {
                return Err(QueueError::Locked);
            }
            state.posted_count += records.len();
            state.queued.extend(records);
            let batches = state.take_full_batches(self.inner.batch_size);
            let progress = state.progress();
            state.outbox.push_back(Notification::Progress(progress));
            (batches, state.session)
        };
        self.inner.deliver();

        for batch in batches {
            self.dispatch(session, batch);
        }
        Ok(())
    }

    /// Locks the queue, optionally flushing the remaining records as one
    /// final (possibly short) batch.
    ///
    /// If nothing is left to write, the observer is told about completion
    /// right away; otherwise completion is signalled when the last
    /// outstanding batch resolves. Calling this on a locked queue does nothing.
    pub fn complete(&self, flush_remaining: bool) {
        let (batch, session) = {
            let mut state = self.inner.lock_state();
            if state.locked {
                debug!(
                    "Queue for '{}' already locked, ignoring complete()",
                    self.inner.target_label
                );
                return;
            }
            state.locked = true;

            let batch = if flush_remaining && !state.queued.is_empty() {
                let remaining = state.queued.len();
                Some(state.take_batch(remaining))
            } else {
                None
            };
            if batch.is_none() && state.all_submitted_persisted() {
                let message = state.completion_message();
                state.outbox.push_back(Notification::Complete(message));
            }
            (batch, state.session)
        };
        self.inner.deliver();

        if let Some(batch) = batch {
            self.dispatch(session, batch);
        }
    }

    /// Whether the queue is locked (completed or aborted).
    pub fn is_complete(&self) -> bool {
        self.inner.lock_state().locked
    }

    /// Starts a new session: empty queue, unlocked, all counters zeroed.
    ///
    /// Batches still in flight from the previous session settle without
    /// touching the new counters or notifying the observer.
    pub fn reset(&self) {
        let mut state = self.inner.lock_state();
        if state.in_flight > 0 {
            debug!(
                "Resetting queue for '{}' with {} batch(es) still in flight",
                self.inner.target_label, state.in_flight
            );
        }
        state.reset();
    }

    /// Current counters.
    pub fn snapshot(&self) -> QueueSnapshot {
        self.inner.lock_state().snapshot()
    }

    /// Waits until no dispatched batch is in flight.
    ///
    /// A batch stops counting as in flight only after its observer
    /// notifications (and every notification decided before them) have been
    /// delivered, so an abort's `on_error`/`on_complete` always precede this.
    pub async fn settled(&self) {
        loop {
            let notified = self.inner.settled.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            let idle = self.inner.lock_state().in_flight == 0;
            if idle {
                return;
            }
            notified.await;
        }
    }

    fn dispatch(&self, session: u64, batch: Vec<Record>) {
        let inner = Arc::clone(&self.inner);
        let len = batch.len();
        debug!(
            "Dispatching batch of {} records to '{}'",
            len, inner.target_label
        );
        tokio::spawn(async move {
            let result = inner.writer.write(&inner.target_label, batch).await;
            inner.settle(session, len, result);
        });
    }
}

impl Inner {
    fn lock_state(&self) -> MutexGuard<'_, QueueState> {
        // Counters stay consistent even if an observer panicked elsewhere.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies a batch outcome to the counters and queues its notifications.
    fn settle(
        &self,
        session: u64,
        len: usize,
        result: Result<Vec<WriteOutcome>, WriteError>,
    ) {
        {
            let mut state = self.lock_state();
            if state.session != session {
                debug!(
                    "Discarding outcome of a {}-record batch from a previous session",
                    len
                );
            } else {
                match result {
                    Ok(_) => {
                        state.successful_count += len;
                        let progress = state.progress();
                        state.outbox.push_back(Notification::Progress(progress));
                        if state.locked && state.all_submitted_persisted() {
                            let message = state.completion_message();
                            state.outbox.push_back(Notification::Complete(message));
                        }
                    }
                    Err(e) if state.aborted => {
                        warn!(
                            "Batch of {} records to '{}' also failed after abort: {}",
                            len, self.target_label, e
                        );
                    }
                    Err(e) => {
                        state.aborted = true;
                        state.locked = true;
                        let message = format!("{}: {}", ABORT_MESSAGE_PREFIX, e);
                        state.outbox.push_back(Notification::Aborted {
                            error: e,
                            message,
                            len,
                        });
                    }
                }
            }
            state.outbox.push_back(Notification::BatchSettled);
        }
        self.deliver();
    }

    /// Drains the outbox unless another caller already is.
    ///
    /// Observer callbacks run with no lock held. A callback that re-enters the
    /// queue only queues its notifications; the active drain picks them up.
    fn deliver(&self) {
        {
            let mut state = self.lock_state();
            if state.delivering {
                return;
            }
            state.delivering = true;
        }
        let mut guard = DeliveryGuard {
            inner: self,
            armed: true,
        };

        loop {
            let pending = {
                let mut state = self.lock_state();
                if state.outbox.is_empty() {
                    state.delivering = false;
                    guard.armed = false;
                    return;
                }
                std::mem::take(&mut state.outbox)
            };
            for notification in pending {
                self.emit(notification);
            }
        }
    }

    fn emit(&self, notification: Notification) {
        match notification {
            Notification::Progress(progress) => {
                self.observer.on_progress(progress.percent, &progress.message);
            }
            Notification::Complete(message) => {
                info!("{}", message);
                self.observer.on_complete(&message);
            }
            Notification::Aborted {
                error,
                message,
                len,
            } => {
                error!(
                    "Failed to write batch of {} records to '{}': {}",
                    len, self.target_label, error
                );
                self.observer.on_error(&error);
                self.observer.on_complete(&message);
            }
            Notification::BatchSettled => {
                let idle = {
                    let mut state = self.lock_state();
                    state.in_flight = state.in_flight.saturating_sub(1);
                    state.in_flight == 0
                };
                if idle {
                    self.settled.notify_waiters();
                }
            }
        }
    }
}

/// Releases the delivery flag if an observer callback panics mid-drain.
struct DeliveryGuard<'a> {
    inner: &'a Inner,
    armed: bool,
}

impl Drop for DeliveryGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.inner.lock_state().delivering = false;
        }
    }
}
