//! CLI tool for driving the Chord ring simulator.
//!
//! Provides commands for:
//! - Replaying the reference join/add/leave scenario
//! - Building a ring from arguments and printing it
//! - Replaying JSON scenario files
//! - Comparing finger and plain lookups

pub mod commands;
pub mod config;
pub mod scenario;

pub use commands::{Command, CommandResult};
pub use config::CliConfig;
pub use scenario::{Scenario, Step};
