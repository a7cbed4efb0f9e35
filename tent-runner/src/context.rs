//! Execution context for build units
//!
//! Contains the state shared by every build unit of a run:
//! - The output sink
//! - The failure counter

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tent_core::domain::log::LogLevel;

use crate::service::LogSink;

/// Failure count shared by every build of a run
///
/// Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct FailureCounter(Arc<AtomicUsize>);

impl FailureCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one failure and returns the new total
    pub fn increment(&self) -> usize {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Execution context handed to each build unit
#[derive(Clone)]
pub struct BuildContext {
    sink: Arc<dyn LogSink>,
    failures: FailureCounter,
}

impl BuildContext {
    /// Creates a new execution context
    ///
    /// # Arguments
    /// * `sink` - Destination for build output
    /// * `failures` - Counter shared by every unit of the run
    pub fn new(sink: Arc<dyn LogSink>, failures: FailureCounter) -> Self {
        Self { sink, failures }
    }

    /// Logs a progress message for build `name`
    pub fn log_info(&self, name: &str, message: &str) {
        self.sink.write(LogLevel::Info, &unit_line(name, message));
    }

    /// Logs a general notice for build `name`
    pub fn log_output(&self, name: &str, message: &str) {
        self.sink.write(LogLevel::Output, &unit_line(name, message));
    }

    /// Logs an error for build `name`
    pub fn log_error(&self, name: &str, message: &str) {
        self.sink.write(LogLevel::Error, &unit_line(name, message));
    }

    /// Logs one line of process output for build `name`
    pub fn log_process_line(&self, name: &str, line: &str) {
        self.sink.write(LogLevel::Output, &process_line(name, line));
    }

    /// Records a failure on the shared counter
    pub fn record_failure(&self) -> usize {
        self.failures.increment()
    }
}

/// Formats a notice line for build `name`
pub fn unit_line(name: &str, message: &str) -> String {
    format!("===> [{}] {}", name, message)
}

/// Formats a line of process output for build `name`
pub fn process_line(name: &str, line: &str) -> String {
    format!("===> [{}]    {}", name, line)
}
