//! Configuration module
//!
//! Handles CLI configuration shared by every command.

use std::path::PathBuf;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the tent configuration file
    pub config_path: PathBuf,
}
