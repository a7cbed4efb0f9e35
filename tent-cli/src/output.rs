//! Console output
//!
//! Prints build output to the terminal: progress in green, general output
//! as-is, errors in red on stderr.

use colored::*;
use tent_core::domain::log::LogLevel;
use tent_runner::LogSink;

/// Sink writing build output to the console
pub struct ConsoleSink;

impl LogSink for ConsoleSink {
    fn write(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Info => println!("{}", message.green()),
            LogLevel::Output => println!("{}", message),
            LogLevel::Error => eprintln!("{}", message.red()),
        }
    }
}
