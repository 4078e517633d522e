//! CLI subcommands.
//!
//! Every command is turned into a [`Scenario`] and replayed against a fresh
//! ring; the command result is whatever the scenario printed.

use std::fmt;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};
use corelib::{FingerSelection, Id, RingConfig};

use crate::scenario::{Scenario, Step};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SelectionArg {
    /// Closest probe by numeric difference (reference behaviour)
    Numeric,
    /// Closest node by clockwise distance
    Clockwise,
}

impl From<SelectionArg> for FingerSelection {
    fn from(arg: SelectionArg) -> Self {
        match arg {
            SelectionArg::Numeric => FingerSelection::Numeric,
            SelectionArg::Clockwise => FingerSelection::Clockwise,
        }
    }
}

/// Ring settings shared by the commands that build a ring from arguments.
#[derive(Clone, Debug, Args)]
pub struct RingArgs {
    /// Identifier space width; ids range over [0, 2^bits)
    #[arg(long, default_value_t = 5)]
    pub bits: u32,

    /// How the finger walk picks its next hop
    #[arg(long, value_enum, default_value_t = SelectionArg::Numeric)]
    pub finger_selection: SelectionArg,
}

impl RingArgs {
    fn config(&self) -> RingConfig {
        RingConfig::new(self.bits).with_finger_selection(self.finger_selection.into())
    }
}

#[derive(Clone, Debug, Subcommand)]
pub enum Command {
    /// Replay the reference scenario on a 32-id ring
    Demo {
        #[arg(long, value_enum, default_value_t = SelectionArg::Numeric)]
        finger_selection: SelectionArg,
        /// Print ring snapshots as JSON
        #[arg(long)]
        json: bool,
    },

    /// Join nodes, add resources, remove nodes, then print the ring
    Simulate {
        #[command(flatten)]
        ring: RingArgs,
        /// Node ids to join, in order
        #[arg(long, value_delimiter = ',')]
        join: Vec<Id>,
        /// Resource ids to add
        #[arg(long, value_delimiter = ',')]
        add: Vec<Id>,
        /// Node ids to remove
        #[arg(long, value_delimiter = ',')]
        leave: Vec<Id>,
        #[arg(long)]
        json: bool,
    },

    /// Replay a JSON scenario file
    Run {
        path: PathBuf,
        #[arg(long)]
        json: bool,
    },

    /// Show the owner of each id under the active and plain lookups
    Lookup {
        #[command(flatten)]
        ring: RingArgs,
        /// Node ids to join before looking up
        #[arg(long, value_delimiter = ',', required = true)]
        join: Vec<Id>,
        /// Ids to look up
        #[arg(required = true)]
        ids: Vec<Id>,
    },
}

impl Command {
    pub fn scenario(&self) -> Result<Scenario> {
        let scenario = match self {
            Command::Demo {
                finger_selection, ..
            } => Scenario::reference(
                RingConfig::new(5).with_finger_selection((*finger_selection).into()),
            ),
            Command::Simulate {
                ring,
                join,
                add,
                leave,
                ..
            } => Scenario::from_phases(ring.config(), join.clone(), add.clone(), leave.clone()),
            Command::Run { path, .. } => Scenario::load(path)?,
            Command::Lookup { ring, join, ids } => Scenario {
                ring: ring.config(),
                steps: vec![Step::Join(join.clone()), Step::Lookup(ids.clone())],
            },
        };
        Ok(scenario)
    }

    fn json(&self) -> bool {
        match self {
            Command::Demo { json, .. } | Command::Simulate { json, .. } | Command::Run { json, .. } => {
                *json
            }
            Command::Lookup { .. } => false,
        }
    }

    pub fn execute(&self) -> Result<CommandResult> {
        let output = self.scenario()?.run(self.json())?;
        Ok(CommandResult { output })
    }
}

/// Printed output of a command, one entry per line or ring dump.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandResult {
    pub output: Vec<String>,
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.output {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CliConfig;
    use clap::Parser;

    fn parse(args: &[&str]) -> Command {
        CliConfig::try_parse_from(args).unwrap().command
    }

    #[test]
    fn test_parse_simulate() {
        let command = parse(&[
            "chord-cli",
            "simulate",
            "--bits",
            "6",
            "--finger-selection",
            "clockwise",
            "--join",
            "12,18",
            "--add",
            "3",
            "--add",
            "40",
        ]);
        let scenario = command.scenario().unwrap();
        assert_eq!(scenario.ring.bits, 6);
        assert_eq!(scenario.ring.finger_selection, FingerSelection::Clockwise);
        assert_eq!(
            scenario.steps,
            vec![Step::Join(vec![12, 18]), Step::Add(vec![3, 40]), Step::Print]
        );
    }

    #[test]
    fn test_lookup_requires_ids() {
        assert!(CliConfig::try_parse_from(["chord-cli", "lookup", "--join", "1"]).is_err());
    }

    #[test]
    fn test_demo_execute() {
        let result = parse(&["chord-cli", "demo"]).execute().unwrap();
        let text = result.to_string();
        assert!(text.contains("Node: 30, Resources: 28 29"));
        assert!(text.contains("Nothing to remove at 12"));
    }

    #[test]
    fn test_demo_execute_clockwise_removes_node() {
        let result = parse(&["chord-cli", "demo", "--finger-selection", "clockwise"])
            .execute()
            .unwrap();
        assert!(!result.to_string().contains("Nothing to remove"));
        assert!(result.to_string().contains("Node: 18, Resources: 7 10 16"));
    }

    #[test]
    fn test_lookup_execute() {
        let result = parse(&["chord-cli", "lookup", "--join", "5,12,18,27,30", "12"])
            .execute()
            .unwrap();
        assert_eq!(
            result.output,
            vec!["Lookup 12: node 18 (0 hops, Warm), successor by ring walk: node 12".to_string()]
        );
    }

    #[test]
    fn test_run_missing_file() {
        let err = parse(&["chord-cli", "run", "/nonexistent/scenario.json"])
            .execute()
            .unwrap_err();
        assert!(err.to_string().contains("reading scenario"));
    }
}
