//! Configuration loading
//!
//! Reads a YAML configuration file into a `Configuration` and checks that
//! every image build can actually be built.

use std::path::Path;
use tracing::debug;

use crate::domain::build::BuildUnit;
use crate::domain::config::Configuration;
use crate::error::{ConfigError, Result};

/// Configuration file looked up when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "tent.yml";

impl Configuration {
    /// Parses a configuration from YAML source
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        Ok(serde_yml::from_str(source)?)
    }

    /// Reads, parses and validates the configuration file at `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading configuration from {}", path.display());

        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_yaml_str(&source)?;
        config.validate()?;

        debug!(
            "Loaded {} deployment(s) with {} build(s)",
            config.deployments.len(),
            config.build_count()
        );

        Ok(config)
    }

    /// Validates every build definition
    ///
    /// Image builds need an image name and a build context. Script builds
    /// are always accepted.
    pub fn validate(&self) -> Result<()> {
        for (deployment_name, deployment) in &self.deployments {
            for (build_name, build) in &deployment.builds {
                let BuildUnit::Image(image) = build else {
                    continue;
                };

                let invalid = |reason: &str| ConfigError::InvalidBuild {
                    deployment: deployment_name.clone(),
                    build: build_name.clone(),
                    reason: reason.to_string(),
                };

                if image.name.trim().is_empty() {
                    return Err(invalid("image name cannot be empty"));
                }

                if image.context.trim().is_empty() {
                    return Err(invalid("build context cannot be empty"));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::build::{ImageBuild, ScriptBuild};
    use std::io::Write;

    const SAMPLE: &str = r#"
concurrent: true
deployments:
  web:
    nomad_file: deploy/web.nomad
    builds:
      app:
        context: .
        registry_url: registry.example.com
        name: team/app
        tags: [latest, v1]
        build_args:
          RUST_VERSION: "1.85"
        target: runtime
        file: docker/Dockerfile
        push: true
      assets:
        script: scripts/build-assets.sh
        name: ignored
"#;

    #[test]
    fn test_parse_sample_configuration() {
        let config = Configuration::from_yaml_str(SAMPLE).unwrap();

        assert!(config.concurrent);
        let web = &config.deployments["web"];
        assert_eq!(web.nomad_file.as_deref(), Some("deploy/web.nomad"));

        match &web.builds["app"] {
            BuildUnit::Image(ImageBuild {
                context,
                tags,
                build_args,
                target,
                file,
                push,
                ..
            }) => {
                assert_eq!(context, ".");
                assert_eq!(tags, &vec!["latest".to_string(), "v1".to_string()]);
                assert_eq!(build_args.get("RUST_VERSION").map(String::as_str), Some("1.85"));
                assert_eq!(target.as_deref(), Some("runtime"));
                assert_eq!(file.as_deref(), Some("docker/Dockerfile"));
                assert!(*push);
            }
            other => panic!("expected image build, got {:?}", other),
        }

        assert_eq!(
            web.builds["assets"],
            BuildUnit::Script(ScriptBuild {
                script: "scripts/build-assets.sh".to_string()
            })
        );
    }

    #[test]
    fn test_defaults_when_fields_missing() {
        let config = Configuration::from_yaml_str("deployments: {}\n").unwrap();
        assert!(!config.concurrent);
        assert!(config.deployments.is_empty());
    }

    #[test]
    fn test_validate_rejects_missing_image_name() {
        let config = Configuration::from_yaml_str(
            r#"
deployments:
  web:
    builds:
      app:
        context: .
"#,
        )
        .unwrap();

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBuild { ref build, .. } if build == "app"));
    }

    #[test]
    fn test_parse_error() {
        let err = Configuration::from_yaml_str("deployments: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = Configuration::load(file.path()).unwrap();
        assert_eq!(config.build_count(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Configuration::load("/nonexistent/tent.yml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
