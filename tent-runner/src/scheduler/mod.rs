//! Scheduler layer for the runner
//!
//! Walks the configured deployments, selects the builds to run and
//! dispatches them onto concurrent tasks within the concurrency budget.

pub mod dispatcher;

pub use dispatcher::{BuildFilter, BuildScheduler};
