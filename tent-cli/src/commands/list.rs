//! List command handler
//!
//! Prints the configured deployments and what each of their builds does.

use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use tent_core::domain::build::BuildUnit;
use tent_core::domain::config::Configuration;

use crate::config::Config;

/// Arguments of `tent list`
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only list this deployment
    #[arg(long)]
    pub deployment: Option<String>,
}

/// Handle the list command
pub async fn handle_list_command(args: ListArgs, config: &Config) -> Result<()> {
    let configuration = Configuration::load(&config.config_path).with_context(|| {
        format!(
            "Failed to load configuration from {}",
            config.config_path.display()
        )
    })?;

    let deployments: Vec<_> = configuration
        .deployments
        .iter()
        .filter(|(name, _)| {
            args.deployment
                .as_deref()
                .is_none_or(|selected| selected.is_empty() || selected == name.as_str())
        })
        .collect();

    if deployments.is_empty() {
        println!("{}", "No deployments found.".yellow());
        return Ok(());
    }

    println!(
        "{}",
        format!(
            "Found {} deployment(s), builds run {}:",
            deployments.len(),
            if configuration.concurrent {
                "concurrently"
            } else {
                "one at a time"
            }
        )
        .bold()
    );
    println!();

    for (name, deployment) in deployments {
        println!("  {} {}", "▸".cyan(), name.bold());
        if let Some(nomad_file) = &deployment.nomad_file {
            println!("    Manifest: {}", nomad_file.dimmed());
        }

        if deployment.builds.is_empty() {
            println!("    {}", "(no builds)".dimmed());
        }

        for (build_name, build) in &deployment.builds {
            for line in describe_build(build_name, build) {
                println!("    {}", line);
            }
        }
        println!();
    }

    Ok(())
}

/// Human-readable description of a build, one entry per line
fn describe_build(name: &str, build: &BuildUnit) -> Vec<String> {
    match build {
        BuildUnit::Script(script) => vec![format!("{} (script): {}", name, script.script)],
        BuildUnit::Image(image) => {
            let mut lines = vec![format!(
                "{} (image{}): context {}",
                name,
                if image.push { ", push" } else { "" },
                image.context
            )];
            lines.extend(
                image
                    .composed_tags()
                    .into_iter()
                    .map(|tag| format!("  - {}", tag)),
            );
            lines
        }
    }
}
