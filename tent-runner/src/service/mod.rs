//! Service layer
//!
//! Services contain the business logic of a build: running scripts,
//! driving the builder for image builds, and collecting output.
//!
//! Executors and sinks are trait-based so tests can substitute them.

mod execution;
mod log_buffer;
pub mod script;

// Re-export traits
pub use execution::BuildExecutor;
pub use log_buffer::LogSink;

// Re-export implementations
pub use execution::StandardBuildExecutor;
pub use log_buffer::InMemoryLogBuffer;
