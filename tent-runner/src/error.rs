//! Error types for build execution

use thiserror::Error;

/// Errors reported by a `Builder` implementation
#[derive(Debug, Error)]
pub enum BuilderError {
    /// The builder process could not be started
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The builder process ran and exited unsuccessfully
    #[error("`{command}` exited with code {exit_code}: {stderr}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },
}

/// Errors raised while executing a single build unit
///
/// None of these abort the run; each one is logged against its unit and
/// counted once.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Script could not be spawned or exited non-zero
    #[error("Error running script {script}: {reason}")]
    ScriptExecution { script: String, reason: String },

    /// Image build failed; pushes for the unit are skipped
    #[error("Failed building image: {0}")]
    ImageBuild(#[source] BuilderError),

    /// Push of a single tag failed; sibling pushes still run
    #[error("Failed pushing the tag {tag}, did you log in? (docker login): {source}")]
    ImagePush {
        tag: String,
        #[source]
        source: BuilderError,
    },
}
