//! Tent Runner
//!
//! Executes the builds of a tent configuration.
//!
//! Architecture:
//! - Builder: image build/push capability (docker CLI or a test double)
//! - Services: single build execution, script running, output sinks
//! - Scheduler: filtering, bounded-concurrency dispatch, result aggregation
//!
//! Unit failures are logged and counted, never propagated; the run summary
//! decides the final exit status.

pub mod builder;
pub mod config;
pub mod context;
pub mod error;
pub mod scheduler;
pub mod service;

pub use builder::{Builder, DockerBuilder, ImageBuildRequest};
pub use config::RunnerConfig;
pub use context::{BuildContext, FailureCounter};
pub use error::{BuildError, BuilderError};
pub use scheduler::{BuildFilter, BuildScheduler};
pub use service::{BuildExecutor, InMemoryLogBuffer, LogSink, StandardBuildExecutor};
