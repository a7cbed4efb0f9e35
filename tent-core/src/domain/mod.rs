//! Core domain types
//!
//! The structures shared between configuration loading (core), execution
//! (runner) and presentation (cli).

pub mod build;
pub mod config;
pub mod log;
pub mod outcome;
