//! Log sinks
//!
//! Every user-visible line produced by a run goes through a `LogSink`.
//! The CLI prints them to the console; tests collect them in memory.

use std::sync::{Arc, Mutex};
use tent_core::domain::log::{LogEntry, LogLevel};

/// Destination for build output
///
/// Shared across concurrently running builds, so implementations must be
/// thread-safe. Lines from different builds may interleave.
pub trait LogSink: Send + Sync {
    /// Writes one line at the given level
    fn write(&self, level: LogLevel, message: &str);
}

/// In-memory implementation of LogSink
///
/// Uses Arc<Mutex<Vec<LogEntry>>> so clones share the same buffer.
#[derive(Clone)]
pub struct InMemoryLogBuffer {
    buffer: Arc<Mutex<Vec<LogEntry>>>,
}

impl InMemoryLogBuffer {
    /// Creates a new in-memory log buffer
    pub fn new() -> Self {
        Self {
            buffer: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Drains all log entries from the buffer
    pub fn drain(&self) -> Vec<LogEntry> {
        let mut buffer = self.buffer.lock().unwrap();
        buffer.drain(..).collect()
    }

    /// Messages currently buffered at `level`, oldest first
    pub fn messages(&self, level: LogLevel) -> Vec<String> {
        let buffer = self.buffer.lock().unwrap();
        buffer
            .iter()
            .filter(|entry| entry.level == level)
            .map(|entry| entry.message.clone())
            .collect()
    }
}

impl Default for InMemoryLogBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for InMemoryLogBuffer {
    fn write(&self, level: LogLevel, message: &str) {
        let mut buffer = self.buffer.lock().unwrap();
        buffer.push(LogEntry::now(level, message));
    }
}
