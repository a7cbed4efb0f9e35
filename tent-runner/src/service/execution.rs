//! Execution service
//!
//! Runs a single build unit:
//! - Script builds run through the shell
//! - Image builds are built with the builder, then every tag is pushed
//!
//! Failures never propagate out of a unit. Each failed step is logged and
//! counted on the shared counter, and the unit reports how many of its own
//! steps failed.

use async_trait::async_trait;
use std::sync::Arc;
use tent_core::domain::build::{BuildUnit, ImageBuild, ScriptBuild};
use tent_core::domain::outcome::BuildOutcome;
use tracing::{debug, error, info};

use crate::builder::{Builder, ImageBuildRequest};
use crate::context::BuildContext;
use crate::error::BuildError;
use crate::service::script::run_script;

/// Service trait for executing build units
#[async_trait]
pub trait BuildExecutor: Send + Sync {
    /// Executes one build unit
    ///
    /// # Arguments
    /// * `name` - Build name, used to prefix every emitted line
    /// * `unit` - The build to run
    /// * `verbose` - Emit process output
    /// * `context` - Output sink and shared failure counter
    ///
    /// # Returns
    /// The unit outcome; failures are also recorded on `context`
    async fn execute(
        &self,
        name: &str,
        unit: &BuildUnit,
        verbose: bool,
        context: &BuildContext,
    ) -> BuildOutcome;
}

/// Standard implementation of BuildExecutor
pub struct StandardBuildExecutor {
    builder: Arc<dyn Builder>,
    shell: String,
}

impl StandardBuildExecutor {
    /// Creates an executor running scripts with `bash`
    pub fn new(builder: Arc<dyn Builder>) -> Self {
        Self {
            builder,
            shell: "bash".to_string(),
        }
    }

    /// Runs scripts with `shell` instead
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }

    /// Runs a script build, returning the number of failed steps
    async fn execute_script(
        &self,
        name: &str,
        build: &ScriptBuild,
        verbose: bool,
        context: &BuildContext,
    ) -> usize {
        context.log_output(name, &format!("Running build script: {}", build.script));

        let output = match run_script(&self.shell, &build.script).await {
            Ok(output) => output,
            Err(e) => {
                record(context, name, &e);
                return 1;
            }
        };

        if verbose {
            for line in output.lines() {
                context.log_process_line(name, line);
            }
        }

        context.log_info(name, "Completed build and push process.");
        0
    }

    /// Runs an image build and its pushes, returning the number of failed steps
    async fn execute_image(
        &self,
        name: &str,
        build: &ImageBuild,
        verbose: bool,
        context: &BuildContext,
    ) -> usize {
        let tags = build.composed_tags();

        let request = ImageBuildRequest {
            name: name.to_string(),
            context: build.context.clone(),
            tags: tags.clone(),
            build_args: build.build_args.clone(),
            target: build.target.clone(),
            cache_from: tags.last().cloned(),
            dockerfile: build.file.clone(),
            verbose,
        };

        if let Err(e) = self.builder.build_image(&request).await {
            record(context, name, &BuildError::ImageBuild(e));
            return 1;
        }

        context.log_info(name, "Finished build.");

        let mut failures = 0;

        if build.push {
            for tag in &tags {
                context.log_output(name, &format!("Pushing tag: {}", tag));

                if let Err(source) = self.builder.push_image(name, tag, verbose).await {
                    let err = BuildError::ImagePush {
                        tag: tag.clone(),
                        source,
                    };
                    record(context, name, &err);
                    failures += 1;
                }
            }
        } else {
            debug!("Push disabled for {}", name);
        }

        // Emitted even when pushes failed; the failure counter decides the run result.
        context.log_info(name, "Completed build and push process.");
        failures
    }
}

#[async_trait]
impl BuildExecutor for StandardBuildExecutor {
    async fn execute(
        &self,
        name: &str,
        unit: &BuildUnit,
        verbose: bool,
        context: &BuildContext,
    ) -> BuildOutcome {
        info!("Starting {} build {}", unit.kind(), name);
        context.log_output(name, "Starting build.");

        let failures = match unit {
            BuildUnit::Script(script) => self.execute_script(name, script, verbose, context).await,
            BuildUnit::Image(image) => self.execute_image(name, image, verbose, context).await,
        };

        let outcome = BuildOutcome::from_failures(failures);
        info!("Build {} finished: {:?}", name, outcome);
        outcome
    }
}

/// Logs a failed step and counts it
fn record(context: &BuildContext, name: &str, err: &BuildError) {
    error!("Build {} failed: {}", name, err);
    context.log_error(name, &err.to_string());
    context.record_failure();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::FailureCounter;
    use crate::error::BuilderError;
    use crate::service::InMemoryLogBuffer;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use tent_core::domain::log::LogLevel;

    /// Builder double recording every call
    #[derive(Default)]
    struct RecordingBuilder {
        fail_build: bool,
        failing_pushes: HashSet<String>,
        builds: Mutex<Vec<ImageBuildRequest>>,
        pushes: Mutex<Vec<String>>,
    }

    impl RecordingBuilder {
        fn failure(command: &str) -> BuilderError {
            BuilderError::CommandFailed {
                command: command.to_string(),
                exit_code: 1,
                stderr: "unauthorized".to_string(),
            }
        }

        fn build_count(&self) -> usize {
            self.builds.lock().unwrap().len()
        }

        fn pushed(&self) -> Vec<String> {
            self.pushes.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Builder for RecordingBuilder {
        async fn build_image(&self, request: &ImageBuildRequest) -> Result<(), BuilderError> {
            self.builds.lock().unwrap().push(request.clone());
            if self.fail_build {
                return Err(Self::failure("docker build"));
            }
            Ok(())
        }

        async fn push_image(
            &self,
            _name: &str,
            tag: &str,
            _verbose: bool,
        ) -> Result<(), BuilderError> {
            self.pushes.lock().unwrap().push(tag.to_string());
            if self.failing_pushes.contains(tag) {
                return Err(Self::failure("docker push"));
            }
            Ok(())
        }
    }

    struct Harness {
        builder: Arc<RecordingBuilder>,
        executor: StandardBuildExecutor,
        buffer: InMemoryLogBuffer,
        context: BuildContext,
        failures: FailureCounter,
    }

    fn harness(builder: RecordingBuilder) -> Harness {
        let builder = Arc::new(builder);
        let buffer = InMemoryLogBuffer::new();
        let failures = FailureCounter::new();
        let context = BuildContext::new(Arc::new(buffer.clone()), failures.clone());

        Harness {
            executor: StandardBuildExecutor::new(builder.clone()),
            builder,
            buffer,
            context,
            failures,
        }
    }

    fn image(tags: &[&str], push: bool) -> BuildUnit {
        BuildUnit::Image(ImageBuild {
            context: ".".to_string(),
            registry_url: "some-registry.somewhere".to_string(),
            name: "my-image".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            push,
            ..Default::default()
        })
    }

    fn script(dir: &tempfile::TempDir, body: &str) -> BuildUnit {
        let path = dir.path().join("build.sh");
        std::fs::write(&path, body).unwrap();
        BuildUnit::script(path.to_string_lossy())
    }

    #[tokio::test]
    async fn test_single_tag_build_and_push() {
        let h = harness(RecordingBuilder::default());

        let outcome = h
            .executor
            .execute("app", &image(&["latest"], true), true, &h.context)
            .await;

        assert_eq!(outcome, BuildOutcome::Succeeded);
        assert_eq!(h.builder.build_count(), 1);
        assert_eq!(h.builder.pushed(), vec!["some-registry.somewhere/my-image:latest"]);
        assert_eq!(h.failures.get(), 0);
    }

    #[tokio::test]
    async fn test_multiple_tags_pushed_in_order() {
        let h = harness(RecordingBuilder::default());

        let outcome = h
            .executor
            .execute("app", &image(&["latest", "v1", "master"], true), false, &h.context)
            .await;

        assert!(outcome.is_success());
        assert_eq!(h.builder.build_count(), 1);
        assert_eq!(
            h.builder.pushed(),
            vec![
                "some-registry.somewhere/my-image:latest",
                "some-registry.somewhere/my-image:v1",
                "some-registry.somewhere/my-image:master",
            ]
        );
        assert_eq!(h.failures.get(), 0);
    }

    #[tokio::test]
    async fn test_build_request_uses_last_tag_as_cache_source() {
        let h = harness(RecordingBuilder::default());

        h.executor
            .execute("app", &image(&["latest", "v1"], false), true, &h.context)
            .await;

        let builds = h.builder.builds.lock().unwrap();
        assert_eq!(builds[0].name, "app");
        assert_eq!(builds[0].tags.len(), 2);
        assert_eq!(
            builds[0].cache_from.as_deref(),
            Some("some-registry.somewhere/my-image:v1")
        );
        assert!(builds[0].verbose);
    }

    #[tokio::test]
    async fn test_no_tags_builds_latest() {
        let h = harness(RecordingBuilder::default());

        h.executor
            .execute("app", &image(&[], true), false, &h.context)
            .await;

        assert_eq!(h.builder.pushed(), vec!["some-registry.somewhere/my-image:latest"]);
    }

    #[tokio::test]
    async fn test_push_disabled_never_pushes() {
        let h = harness(RecordingBuilder::default());

        let outcome = h
            .executor
            .execute("app", &image(&["a", "b", "c"], false), false, &h.context)
            .await;

        assert!(outcome.is_success());
        assert_eq!(h.builder.build_count(), 1);
        assert!(h.builder.pushed().is_empty());
        assert!(
            h.buffer
                .messages(LogLevel::Info)
                .contains(&"===> [app] Completed build and push process.".to_string())
        );
    }

    #[tokio::test]
    async fn test_build_failure_skips_pushes() {
        let h = harness(RecordingBuilder {
            fail_build: true,
            ..Default::default()
        });

        let outcome = h
            .executor
            .execute("app", &image(&["latest", "v1"], true), false, &h.context)
            .await;

        assert_eq!(outcome, BuildOutcome::Failed { failures: 1 });
        assert!(h.builder.pushed().is_empty());
        assert_eq!(h.failures.get(), 1);

        let errors = h.buffer.messages(LogLevel::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("===> [app] Failed building image:"));
        assert!(h.buffer.messages(LogLevel::Info).is_empty());
    }

    #[tokio::test]
    async fn test_push_failures_counted_per_tag_and_all_attempted() {
        let h = harness(RecordingBuilder {
            failing_pushes: HashSet::from([
                "some-registry.somewhere/my-image:latest".to_string(),
                "some-registry.somewhere/my-image:v1".to_string(),
            ]),
            ..Default::default()
        });

        let outcome = h
            .executor
            .execute("app", &image(&["latest", "v1", "v2"], true), false, &h.context)
            .await;

        assert_eq!(outcome, BuildOutcome::Failed { failures: 2 });
        assert_eq!(h.builder.pushed().len(), 3);
        assert_eq!(h.failures.get(), 2);

        let errors = h.buffer.messages(LogLevel::Error);
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("Failed pushing the tag some-registry.somewhere/my-image:latest"));
        assert!(errors[1].contains("did you log in?"));

        // The completion notice is still emitted after failed pushes.
        assert_eq!(
            h.buffer.messages(LogLevel::Info).last().map(String::as_str),
            Some("===> [app] Completed build and push process.")
        );
    }

    #[tokio::test]
    async fn test_failing_script_never_invokes_builder() {
        let dir = tempfile::tempdir().unwrap();
        let h = harness(RecordingBuilder::default());

        let outcome = h
            .executor
            .execute("assets", &script(&dir, "exit 1\n"), true, &h.context)
            .await;

        assert_eq!(outcome, BuildOutcome::Failed { failures: 1 });
        assert_eq!(h.failures.get(), 1);
        assert_eq!(h.builder.build_count(), 0);
        assert!(h.builder.pushed().is_empty());

        let errors = h.buffer.messages(LogLevel::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("===> [assets] Error running script"));
    }

    #[tokio::test]
    async fn test_verbose_script_output_prefixed() {
        let dir = tempfile::tempdir().unwrap();
        let h = harness(RecordingBuilder::default());

        let outcome = h
            .executor
            .execute("assets", &script(&dir, "echo hello\necho world\n"), true, &h.context)
            .await;

        assert!(outcome.is_success());
        assert_eq!(h.builder.build_count(), 0);

        let output = h.buffer.messages(LogLevel::Output);
        assert_eq!(output[0], "===> [assets] Starting build.");
        assert!(output[1].starts_with("===> [assets] Running build script:"));
        assert_eq!(&output[2..], ["===> [assets]    hello", "===> [assets]    world"]);
        assert_eq!(
            h.buffer.messages(LogLevel::Info),
            vec!["===> [assets] Completed build and push process."]
        );
    }

    #[tokio::test]
    async fn test_quiet_script_output_suppressed() {
        let dir = tempfile::tempdir().unwrap();
        let h = harness(RecordingBuilder::default());

        h.executor
            .execute("assets", &script(&dir, "echo hidden\n"), false, &h.context)
            .await;

        assert!(
            !h.buffer
                .messages(LogLevel::Output)
                .iter()
                .any(|line| line.contains("hidden"))
        );
    }
}
