//! Tent Core
//!
//! Core types and pure logic for the tent build orchestrator.
//!
//! This crate contains:
//! - Domain types: configuration, deployments, build units, outcomes
//! - Tag composition for image references
//! - Configuration loading and validation

pub mod config;
pub mod domain;
pub mod error;
pub mod tag;

pub use domain::build::{BuildUnit, ImageBuild, ScriptBuild};
pub use domain::config::{Configuration, Deployment};
pub use domain::log::{LogEntry, LogLevel};
pub use domain::outcome::{BuildOutcome, RunSummary};
pub use error::ConfigError;
