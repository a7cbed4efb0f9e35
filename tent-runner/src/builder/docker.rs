//! Docker builder
//!
//! Drives the docker CLI for image builds and pushes:
//! - Checking docker availability
//! - Translating build requests into `docker build` arguments
//! - Pushing individual tags
//! - Forwarding process output to the sink in verbose mode

use async_trait::async_trait;
use std::process::Output;
use std::sync::Arc;
use tent_core::domain::log::LogLevel;
use tokio::process::Command;
use tracing::{debug, error, info};

use super::{Builder, ImageBuildRequest};
use crate::context::process_line;
use crate::error::BuilderError;
use crate::service::LogSink;

/// Builder backed by the docker command line
pub struct DockerBuilder {
    /// Program invoked for every operation (usually `docker`)
    binary: String,

    /// Receives process output when a call is verbose
    sink: Option<Arc<dyn LogSink>>,
}

impl DockerBuilder {
    /// Creates a builder invoking `binary`
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            sink: None,
        }
    }

    /// Forwards verbose process output to `sink`
    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Checks that the docker binary can be executed
    pub async fn check_available(&self) -> Result<String, BuilderError> {
        let output = self.run(&["--version".to_string()]).await?;
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        info!("Docker is available: {}", version);
        Ok(version)
    }

    /// Arguments for `docker build`
    ///
    /// Build args are passed in key order; the context path comes last.
    pub fn build_args(request: &ImageBuildRequest) -> Vec<String> {
        let mut args = vec!["build".to_string()];

        for tag in &request.tags {
            args.push("-t".to_string());
            args.push(tag.clone());
        }

        for (key, value) in &request.build_args {
            args.push("--build-arg".to_string());
            args.push(format!("{}={}", key, value));
        }

        if let Some(target) = &request.target {
            args.push("--target".to_string());
            args.push(target.clone());
        }

        if let Some(cache_from) = &request.cache_from {
            args.push("--cache-from".to_string());
            args.push(cache_from.clone());
        }

        if let Some(dockerfile) = &request.dockerfile {
            args.push("-f".to_string());
            args.push(dockerfile.clone());
        }

        args.push(request.context.clone());
        args
    }

    /// Arguments for `docker push`
    pub fn push_args(tag: &str) -> Vec<String> {
        vec!["push".to_string(), tag.to_string()]
    }

    /// Runs the binary and fails on a non-zero exit
    async fn run(&self, args: &[String]) -> Result<Output, BuilderError> {
        let command_line = format!("{} {}", self.binary, args.join(" "));
        debug!("Running {}", command_line);

        let output = Command::new(&self.binary)
            .args(args)
            .output()
            .await
            .map_err(|source| BuilderError::Spawn {
                program: self.binary.clone(),
                source,
            })?;

        if !output.status.success() {
            let exit_code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

            error!(
                "Command failed: {} exit_code={} stderr='{}'",
                command_line, exit_code, stderr
            );

            return Err(BuilderError::CommandFailed {
                command: command_line,
                exit_code,
                stderr,
            });
        }

        debug!(
            "Command completed: stdout_len={}, stderr_len={}",
            output.stdout.len(),
            output.stderr.len()
        );

        Ok(output)
    }

    /// Emits captured output line by line when verbose
    fn forward_output(&self, name: &str, output: &Output, verbose: bool) {
        let Some(sink) = self.sink.as_ref().filter(|_| verbose) else {
            return;
        };

        for stream in [&output.stdout, &output.stderr] {
            for line in String::from_utf8_lossy(stream).lines() {
                sink.write(LogLevel::Output, &process_line(name, line));
            }
        }
    }
}

impl Default for DockerBuilder {
    fn default() -> Self {
        Self::new("docker")
    }
}

#[async_trait]
impl Builder for DockerBuilder {
    async fn build_image(&self, request: &ImageBuildRequest) -> Result<(), BuilderError> {
        info!(
            "Building image for {} with {} tag(s)",
            request.name,
            request.tags.len()
        );

        let output = self.run(&Self::build_args(request)).await?;
        self.forward_output(&request.name, &output, request.verbose);
        Ok(())
    }

    async fn push_image(&self, name: &str, tag: &str, verbose: bool) -> Result<(), BuilderError> {
        info!("Pushing {} for {}", tag, name);

        let output = self.run(&Self::push_args(tag)).await?;
        self.forward_output(name, &output, verbose);
        Ok(())
    }
}
