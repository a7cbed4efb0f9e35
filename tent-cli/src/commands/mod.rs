//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod build;
mod list;

pub use build::BuildArgs;
pub use list::ListArgs;

use anyhow::Result;
use clap::Subcommand;
use std::process::ExitCode;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the project according to the configuration
    Build(BuildArgs),
    /// List configured deployments and their builds
    List(ListArgs),
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Returns
/// The process exit code
pub async fn handle_command(command: Commands, config: &Config) -> Result<ExitCode> {
    match command {
        Commands::Build(args) => build::handle_build_command(args, config).await,
        Commands::List(args) => {
            list::handle_list_command(args, config).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
