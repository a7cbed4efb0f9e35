//! Build outcome types
//!
//! Outcomes only exist while a run is in progress; nothing is persisted.

use serde::{Deserialize, Serialize};

/// Result of executing one build unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildOutcome {
    Succeeded,
    /// At least one step failed; `failures` counts every failed step
    /// (a unit with several failed pushes reports each of them)
    Failed { failures: usize },
}

impl BuildOutcome {
    pub fn from_failures(failures: usize) -> Self {
        if failures == 0 {
            BuildOutcome::Succeeded
        } else {
            BuildOutcome::Failed { failures }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, BuildOutcome::Succeeded)
    }

    pub fn failures(&self) -> usize {
        match self {
            BuildOutcome::Succeeded => 0,
            BuildOutcome::Failed { failures } => *failures,
        }
    }
}

/// Aggregate result of a scheduler run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Build units dispatched after filtering
    pub dispatched: usize,
    /// Value of the shared failure counter once every unit finished
    pub failures: usize,
}

impl RunSummary {
    pub fn success(&self) -> bool {
        self.failures == 0
    }

    /// Process exit code: 0 when every unit succeeded, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        if self.success() { 0 } else { 1 }
    }
}
