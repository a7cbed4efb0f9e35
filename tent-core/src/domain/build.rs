//! Build unit domain types
//!
//! A build unit is either a script run through the shell or an image
//! build (optionally followed by a push of every composed tag).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::tag::compose_tags;

/// A single named build task within a deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BuildDefinition", into = "BuildDefinition")]
pub enum BuildUnit {
    Script(ScriptBuild),
    Image(ImageBuild),
}

/// Build that runs a shell script instead of building an image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptBuild {
    /// Script path (or command string) handed to the shell
    pub script: String,
}

/// Image build followed by an optional push
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageBuild {
    /// Build context directory
    pub context: String,
    /// Registry URL, may be empty for local images
    pub registry_url: String,
    /// Image name, e.g. `team/app`
    pub name: String,
    /// Tag names; empty means `latest`
    pub tags: Vec<String>,
    pub build_args: BTreeMap<String, String>,
    /// Target stage of a multi-stage Dockerfile
    pub target: Option<String>,
    /// Dockerfile path, relative to the working directory
    pub file: Option<String>,
    pub push: bool,
}

impl ImageBuild {
    /// Fully-qualified tags this build produces, in declaration order
    pub fn composed_tags(&self) -> Vec<String> {
        compose_tags(&self.registry_url, &self.name, self.tags.as_slice())
    }
}

impl BuildUnit {
    /// Creates a script build
    pub fn script(script: impl Into<String>) -> Self {
        BuildUnit::Script(ScriptBuild {
            script: script.into(),
        })
    }

    /// Short label for the build mode
    pub fn kind(&self) -> &'static str {
        match self {
            BuildUnit::Script(_) => "script",
            BuildUnit::Image(_) => "image",
        }
    }
}

/// Flat on-disk shape of a build definition
///
/// Every field is optional. A non-empty `script` selects script mode and
/// the image fields are then ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub context: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub registry_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub build_args: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default)]
    pub push: bool,
}

impl From<BuildDefinition> for BuildUnit {
    fn from(def: BuildDefinition) -> Self {
        match def.script {
            Some(script) if !script.trim().is_empty() => BuildUnit::Script(ScriptBuild { script }),
            _ => BuildUnit::Image(ImageBuild {
                context: def.context,
                registry_url: def.registry_url,
                name: def.name,
                tags: def.tags,
                build_args: def.build_args,
                target: def.target.filter(|t| !t.is_empty()),
                file: def.file.filter(|f| !f.is_empty()),
                push: def.push,
            }),
        }
    }
}

impl From<BuildUnit> for BuildDefinition {
    fn from(unit: BuildUnit) -> Self {
        match unit {
            BuildUnit::Script(s) => BuildDefinition {
                script: Some(s.script),
                ..Default::default()
            },
            BuildUnit::Image(i) => BuildDefinition {
                script: None,
                context: i.context,
                registry_url: i.registry_url,
                name: i.name,
                tags: i.tags,
                build_args: i.build_args,
                target: i.target,
                file: i.file,
                push: i.push,
            },
        }
    }
}
