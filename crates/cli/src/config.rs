//! Top-level CLI configuration and logging setup.

use anyhow::{anyhow, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::commands::Command;

/// Drive an in-memory Chord ring: join and remove nodes, place resources
/// and inspect finger-table lookups.
#[derive(Debug, Parser)]
#[command(name = "chord-cli", version)]
pub struct CliConfig {
    /// Log filter used when `RUST_LOG` is unset (e.g. "info", "corelib=debug")
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    pub fn run(self) -> Result<()> {
        init_logging(&self.log_level)?;
        let result = self.command.execute()?;
        print!("{result}");
        Ok(())
    }
}

/// Installs a `fmt` subscriber on stderr so ring dumps on stdout stay clean.
pub fn init_logging(level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("failed to install log subscriber: {err}"))
}
