//! Error types for configuration handling

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while loading or validating a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration is not valid YAML or has the wrong shape
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_yml::Error),

    /// A build definition is incomplete
    #[error("invalid build '{build}' in deployment '{deployment}': {reason}")]
    InvalidBuild {
        deployment: String,
        build: String,
        reason: String,
    },
}
