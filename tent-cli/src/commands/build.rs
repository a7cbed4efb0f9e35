//! Build command handler
//!
//! Loads the configuration, wires the docker builder into the scheduler
//! and runs every selected build.

use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use std::process::ExitCode;
use std::sync::Arc;
use tent_core::domain::build::BuildUnit;
use tent_core::domain::config::Configuration;
use tent_runner::{
    BuildFilter, BuildScheduler, DockerBuilder, LogSink, RunnerConfig, StandardBuildExecutor,
};
use tracing::warn;

use crate::config::Config;
use crate::output::ConsoleSink;

/// Arguments of `tent build`
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Only run builds of this deployment
    #[arg(long)]
    pub deployment: Option<String>,

    /// Only run builds with this name
    #[arg(long)]
    pub build: Option<String>,

    /// Print script and docker output
    #[arg(short, long)]
    pub verbose: bool,
}

impl BuildArgs {
    fn filter(&self) -> BuildFilter {
        BuildFilter::new(self.deployment.clone(), self.build.clone())
    }
}

/// Handle the build command
///
/// # Returns
/// Success when every selected build succeeded, failure otherwise
pub async fn handle_build_command(args: BuildArgs, config: &Config) -> Result<ExitCode> {
    let configuration = Configuration::load(&config.config_path).with_context(|| {
        format!(
            "Failed to load configuration from {}",
            config.config_path.display()
        )
    })?;

    let runner_config = RunnerConfig::from_env().context("Invalid runner configuration")?;

    let sink: Arc<dyn LogSink> = Arc::new(ConsoleSink);
    let builder =
        DockerBuilder::new(runner_config.docker_binary.clone()).with_sink(Arc::clone(&sink));

    if has_selected_image_builds(&configuration, &args.filter()) {
        if let Err(e) = builder.check_available().await {
            warn!("Docker availability check failed: {}", e);
            println!(
                "{}",
                format!("⚠ {} does not appear to be usable: {}", runner_config.docker_binary, e)
                    .yellow()
            );
        }
    }

    let executor =
        StandardBuildExecutor::new(Arc::new(builder)).with_shell(runner_config.script_shell);
    let scheduler = BuildScheduler::new(Arc::new(executor), sink);

    let summary = scheduler
        .run(&configuration, &args.filter(), args.verbose)
        .await?;

    Ok(ExitCode::from(summary.exit_code() as u8))
}

/// Whether any build selected by `filter` needs the builder
fn has_selected_image_builds(configuration: &Configuration, filter: &BuildFilter) -> bool {
    configuration
        .deployments
        .iter()
        .filter(|(name, _)| filter.matches_deployment(name))
        .flat_map(|(_, deployment)| deployment.builds.iter())
        .any(|(name, build)| filter.matches_build(name) && matches!(build, BuildUnit::Image(_)))
}
