//! Queue bookkeeping and progress computation.
//!
//! Everything here is synchronous and lock-free by itself; the owning queue
//! keeps a `QueueState` behind a mutex and never holds it across an `.await`.

use std::collections::VecDeque;

use crate::error_handling::WriteError;

use super::Record;

/// An observer call waiting to be delivered, in the order it was decided.
#[derive(Debug)]
pub(crate) enum Notification {
    Progress(Progress),
    Complete(String),
    Aborted {
        error: WriteError,
        message: String,
        len: usize,
    },
    /// A dispatched batch has been fully reported; lowers `in_flight`.
    BatchSettled,
}

/// Mutable state of one persistence session.
#[derive(Debug, Default)]
pub(crate) struct QueueState {
    pub(crate) queued: VecDeque<Record>,
    pub(crate) locked: bool,
    pub(crate) posted_count: usize,
    pub(crate) submitted_count: usize,
    pub(crate) successful_count: usize,
    /// Set by the first failed write; later failures are not signalled again.
    pub(crate) aborted: bool,
    /// Bumped by `reset`. Batches carry the session they were dispatched in.
    pub(crate) session: u64,
    /// Dispatched batches not yet resolved and reported, across sessions.
    pub(crate) in_flight: usize,
    /// Notifications queued under this lock, delivered oldest first.
    pub(crate) outbox: VecDeque<Notification>,
    /// Set while one caller is draining `outbox`.
    pub(crate) delivering: bool,
}

/// A progress notification: integer percent plus a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    /// `floor(100 * successful / (queued + submitted))`
    pub percent: u32,
    /// e.g. `"10 items read / 4 persisted"`
    pub message: String,
}

/// Read-only copy of the queue counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueSnapshot {
    /// Records waiting for a full batch
    pub queued: usize,
    /// Records accepted by `add` in this session
    pub posted: usize,
    /// Records handed to the writer
    pub submitted: usize,
    /// Records whose batch was written successfully
    pub successful: usize,
    /// Whether the queue refuses further records
    pub locked: bool,
    /// Whether a write failed in this session
    pub aborted: bool,
    /// Batches still awaiting the writer
    pub in_flight: usize,
}

impl QueueState {
    /// Fresh state for the next session: counters zeroed, unlocked, empty.
    ///
    /// `in_flight` survives so `settled()` still waits for batches of the
    /// previous session, and notifications already decided are still delivered.
    pub(crate) fn reset(&mut self) {
        let session = self.session.wrapping_add(1);
        let in_flight = self.in_flight;
        let outbox = std::mem::take(&mut self.outbox);
        let delivering = self.delivering;
        *self = QueueState {
            session,
            in_flight,
            outbox,
            delivering,
            ..QueueState::default()
        };
    }

    /// Removes the oldest `size` records as one batch and counts them as submitted.
    pub(crate) fn take_batch(&mut self, size: usize) -> Vec<Record> {
        let size = size.min(self.queued.len());
        let batch: Vec<Record> = self.queued.drain(..size).collect();
        self.submitted_count += batch.len();
        self.in_flight += 1;
        batch
    }

    /// Pops every full batch currently queued, oldest first.
    pub(crate) fn take_full_batches(&mut self, batch_size: usize) -> Vec<Vec<Record>> {
        let mut batches = Vec::new();
        while self.queued.len() >= batch_size {
            batches.push(self.take_batch(batch_size));
        }
        batches
    }

    /// True once everything submitted so far has been written.
    pub(crate) fn all_submitted_persisted(&self) -> bool {
        self.submitted_count == self.successful_count
    }

    // Denominator only knows about records posted so far, so the value can
    // drop after a later `add`.
    pub(crate) fn percent(&self) -> u32 {
        let denominator = self.queued.len() + self.submitted_count;
        if denominator == 0 {
            return 0;
        }
        (100 * self.successful_count / denominator) as u32
    }

    pub(crate) fn progress(&self) -> Progress {
        let percent = self.percent();
        let message = if self.locked {
            format!(
                "{} of {} items persisted ({}%)",
                self.successful_count, self.posted_count, percent
            )
        } else if self.successful_count > 0 {
            format!(
                "{} items read / {} persisted",
                self.posted_count, self.successful_count
            )
        } else {
            format!("{} items read", self.posted_count)
        };
        Progress { percent, message }
    }

    pub(crate) fn completion_message(&self) -> String {
        format!("{} items have been persisted", self.successful_count)
    }

    pub(crate) fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            queued: self.queued.len(),
            posted: self.posted_count,
            submitted: self.submitted_count,
            successful: self.successful_count,
            locked: self.locked,
            aborted: self.aborted,
            in_flight: self.in_flight,
        }
    }
}
