//! Runner configuration
//!
//! Settings for the external programs the runner drives. Loaded from the
//! environment with defaults for local use.

/// Runner configuration
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Program used for image builds and pushes
    pub docker_binary: String,

    /// Shell used to run script builds
    pub script_shell: String,
}

impl RunnerConfig {
    /// Creates a new configuration
    pub fn new(docker_binary: impl Into<String>, script_shell: impl Into<String>) -> Self {
        Self {
            docker_binary: docker_binary.into(),
            script_shell: script_shell.into(),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - TENT_DOCKER_BIN (optional, default: docker)
    /// - TENT_SCRIPT_SHELL (optional, default: bash)
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let docker_binary = std::env::var("TENT_DOCKER_BIN").unwrap_or(defaults.docker_binary);
        let script_shell = std::env::var("TENT_SCRIPT_SHELL").unwrap_or(defaults.script_shell);

        let config = Self {
            docker_binary,
            script_shell,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.docker_binary.trim().is_empty() {
            anyhow::bail!("docker_binary cannot be empty");
        }

        if self.script_shell.trim().is_empty() {
            anyhow::bail!("script_shell cannot be empty");
        }

        Ok(())
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self::new("docker", "bash")
    }
}
