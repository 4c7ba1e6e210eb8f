//! Progress logging.

use std::sync::Mutex;
use std::time::Instant;

use log::{error, info};

use crate::error_handling::WriteError;
use crate::queue::ProgressObserver;

/// [`ProgressObserver`] that reports through the `log` facade.
///
/// It also keeps the last completion message and the first error so the
/// import driver can put them in its report.
pub struct LogObserver {
    start_time: Instant,
    completion: Mutex<Option<String>>,
    error: Mutex<Option<String>>,
}

impl LogObserver {
    /// Creates an observer; elapsed time is measured from here.
    pub fn new() -> Self {
        LogObserver {
            start_time: Instant::now(),
            completion: Mutex::new(None),
            error: Mutex::new(None),
        }
    }

    /// Last message passed to `on_complete`, if any.
    pub fn completion_message(&self) -> Option<String> {
        self.completion
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Display form of the error passed to `on_error`, if any.
    pub fn error_message(&self) -> Option<String> {
        self.error.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Default for LogObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressObserver for LogObserver {
    fn on_progress(&self, percent: u32, message: &str) {
        info!("{} ({}%)", message, percent);
    }

    fn on_complete(&self, message: &str) {
        info!(
            "{} after {:.2} seconds",
            message,
            self.start_time.elapsed().as_secs_f64()
        );
        *self.completion.lock().unwrap_or_else(|e| e.into_inner()) = Some(message.to_string());
    }

    fn on_error(&self, err: &WriteError) {
        error!("Persisting failed: {}", err);
        *self.error.lock().unwrap_or_else(|e| e.into_inner()) = Some(err.to_string());
    }
}
