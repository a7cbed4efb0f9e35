//! Build dispatcher
//!
//! Dispatches every selected build unit onto its own task. A semaphore sized
//! to the concurrency budget bounds how many units run at once, and a join
//! set acts as the completion barrier before the run result is computed.

use anyhow::{Context as AnyhowContext, Result};
use std::sync::Arc;
use tent_core::domain::config::Configuration;
use tent_core::domain::log::LogLevel;
use tent_core::domain::outcome::{BuildOutcome, RunSummary};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::context::{BuildContext, FailureCounter};
use crate::service::{BuildExecutor, LogSink};

/// Deployment and build name selectors
///
/// An absent or empty selector matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildFilter {
    deployment: Option<String>,
    build: Option<String>,
}

impl BuildFilter {
    pub fn new(deployment: Option<String>, build: Option<String>) -> Self {
        Self {
            deployment: deployment.filter(|d| !d.is_empty()),
            build: build.filter(|b| !b.is_empty()),
        }
    }

    /// Filter matching every deployment and build
    pub fn all() -> Self {
        Self::default()
    }

    pub fn matches_deployment(&self, name: &str) -> bool {
        self.deployment.as_deref().is_none_or(|d| d == name)
    }

    pub fn matches_build(&self, name: &str) -> bool {
        self.build.as_deref().is_none_or(|b| b == name)
    }
}

/// Runs the builds of a configuration with bounded concurrency
pub struct BuildScheduler {
    executor: Arc<dyn BuildExecutor>,
    sink: Arc<dyn LogSink>,
}

impl BuildScheduler {
    /// Creates a new scheduler
    pub fn new(executor: Arc<dyn BuildExecutor>, sink: Arc<dyn LogSink>) -> Self {
        Self { executor, sink }
    }

    /// Runs every build selected by `filter` and waits for all of them
    ///
    /// Unit failures never stop the run; they are counted, and the returned
    /// summary fails when the count is non-zero.
    pub async fn run(
        &self,
        config: &Configuration,
        filter: &BuildFilter,
        verbose: bool,
    ) -> Result<RunSummary> {
        let budget = config.concurrency_budget();
        self.sink.write(
            LogLevel::Output,
            &format!("===> Running up to {} builds concurrently.", budget),
        );

        let semaphore = Arc::new(Semaphore::new(budget));
        let failures = FailureCounter::new();
        let context = BuildContext::new(Arc::clone(&self.sink), failures.clone());

        let mut tasks = JoinSet::new();
        let mut dispatched = 0;

        for (deployment_name, deployment) in &config.deployments {
            if !filter.matches_deployment(deployment_name) {
                debug!("Skipping deployment {}", deployment_name);
                continue;
            }

            for (build_name, unit) in &deployment.builds {
                if !filter.matches_build(build_name) {
                    debug!("Skipping build {} in {}", build_name, deployment_name);
                    continue;
                }

                // Blocks the dispatch loop while the budget is exhausted
                let permit = Arc::clone(&semaphore)
                    .acquire_owned()
                    .await
                    .context("Build semaphore closed")?;

                let executor = Arc::clone(&self.executor);
                let context = context.clone();
                let name = build_name.clone();
                let unit = unit.clone();

                debug!("Dispatching build {} from {}", name, deployment_name);

                tasks.spawn(async move {
                    let outcome = executor.execute(&name, &unit, verbose, &context).await;
                    drop(permit);
                    (name, outcome)
                });
                dispatched += 1;
            }
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((name, BuildOutcome::Succeeded)) => debug!("Build {} succeeded", name),
                Ok((name, BuildOutcome::Failed { failures })) => {
                    debug!("Build {} failed with {} error(s)", name, failures)
                }
                Err(e) => {
                    error!("Build task panicked: {}", e);
                    context.record_failure();
                }
            }
        }

        let summary = RunSummary {
            dispatched,
            failures: failures.get(),
        };

        info!(
            "Run finished: {} build(s), {} failure(s)",
            summary.dispatched, summary.failures
        );

        if !summary.success() {
            self.sink.write(LogLevel::Error, "Exiting with errors.");
        }

        Ok(summary)
    }
}
