// Shared test helpers for database setup and test data creation.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use entry_persister::{Config, LogFormat, LogLevel, ProgressObserver, Record, WriteError};
use serde_json::json;

/// Builds `n` records with a sequential `row` field.
#[allow(dead_code)] // Used by other test files
pub fn rows(start: i64, n: i64) -> Vec<Record> {
    (start..start + n)
        .map(|i| {
            let mut r = Record::new();
            r.insert("row".to_string(), json!(i));
            r.insert("region".to_string(), json!(if i % 2 == 0 { "north" } else { "south" }));
            r
        })
        .collect()
}

/// Writes a CSV file with a header and `n` data rows and returns its path.
#[allow(dead_code)] // Used by other test files
pub fn write_csv(dir: &Path, name: &str, n: usize) -> PathBuf {
    let mut content = String::from("region,product,amount\n");
    for i in 0..n {
        content.push_str(&format!("r{},p{},{}\n", i % 3, i, i * 10));
    }
    let path = dir.join(name);
    std::fs::write(&path, content).expect("Failed to write test CSV");
    path
}

/// Minimal import config pointing at `file` and `db_path`.
#[allow(dead_code)] // Used by other test files
pub fn import_config(file: PathBuf, db_path: PathBuf, batch_size: usize) -> Config {
    Config {
        file,
        format: None,
        target: "sales".to_string(),
        log_level: LogLevel::Error, // Reduce log noise
        log_format: LogFormat::Plain,
        db_path,
        batch_size,
        chunk_size: 7,
        flush_remaining: true,
    }
}

/// Notification received by [`RecordingObserver`].
#[allow(dead_code)] // Used by other test files
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Progress(u32, String),
    Complete(String),
    Error(String),
}

/// Observer that records every notification in order.
#[allow(dead_code)] // Used by other test files
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<Event>>,
}

#[allow(dead_code)] // Used by other test files
impl RecordingObserver {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn progress(&self) -> Vec<(u32, String)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Progress(p, m) => Some((p, m)),
                _ => None,
            })
            .collect()
    }

    pub fn completions(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Complete(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Error(m) => Some(m),
                _ => None,
            })
            .collect()
    }
}

impl ProgressObserver for RecordingObserver {
    fn on_progress(&self, percent: u32, message: &str) {
        self.events
            .lock()
            .unwrap()
            .push(Event::Progress(percent, message.to_string()));
    }

    fn on_complete(&self, message: &str) {
        self.events
            .lock()
            .unwrap()
            .push(Event::Complete(message.to_string()));
    }

    fn on_error(&self, error: &WriteError) {
        self.events
            .lock()
            .unwrap()
            .push(Event::Error(error.to_string()));
    }
}
