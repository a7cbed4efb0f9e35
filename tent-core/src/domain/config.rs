//! Configuration domain types
//!
//! Deployments and builds are kept in ordered maps so that every walk over
//! the configuration visits them in the same (sorted) order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::build::BuildUnit;

/// Number of builds allowed to run at once when concurrent builds are enabled
pub const CONCURRENT_BUILD_LIMIT: usize = 5;

/// Root of a tent configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Run builds concurrently (up to `CONCURRENT_BUILD_LIMIT`)
    #[serde(default)]
    pub concurrent: bool,

    #[serde(default)]
    pub deployments: BTreeMap<String, Deployment>,
}

/// A named group of builds
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    /// Deployment manifest this group belongs to; carried, never interpreted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nomad_file: Option<String>,

    #[serde(default)]
    pub builds: BTreeMap<String, BuildUnit>,
}

impl Configuration {
    /// Maximum number of builds running at the same time
    pub fn concurrency_budget(&self) -> usize {
        if self.concurrent {
            CONCURRENT_BUILD_LIMIT
        } else {
            1
        }
    }

    /// Adds (or replaces) a deployment
    pub fn with_deployment(mut self, name: impl Into<String>, deployment: Deployment) -> Self {
        self.deployments.insert(name.into(), deployment);
        self
    }

    /// Total number of builds across all deployments
    pub fn build_count(&self) -> usize {
        self.deployments.values().map(|d| d.builds.len()).sum()
    }
}

impl Deployment {
    /// Adds (or replaces) a build
    pub fn with_build(mut self, name: impl Into<String>, build: BuildUnit) -> Self {
        self.builds.insert(name.into(), build);
        self
    }
}
