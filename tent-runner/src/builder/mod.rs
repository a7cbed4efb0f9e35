//! Builder capability
//!
//! The collaborator that actually builds and pushes images. Production runs
//! use `DockerBuilder`; tests substitute their own implementations.

mod docker;

pub use docker::DockerBuilder;

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::error::BuilderError;

/// Everything needed to build one image
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageBuildRequest {
    /// Build unit name, used to prefix output
    pub name: String,
    /// Build context directory
    pub context: String,
    /// Fully-qualified tags applied to the image
    pub tags: Vec<String>,
    pub build_args: BTreeMap<String, String>,
    pub target: Option<String>,
    /// Image reference used as a layer cache source
    pub cache_from: Option<String>,
    pub dockerfile: Option<String>,
    pub verbose: bool,
}

/// Image build and push operations
#[async_trait]
pub trait Builder: Send + Sync {
    /// Builds an image and applies every requested tag
    async fn build_image(&self, request: &ImageBuildRequest) -> Result<(), BuilderError>;

    /// Pushes a single tag to its registry
    async fn push_image(&self, name: &str, tag: &str, verbose: bool) -> Result<(), BuilderError>;
}
