//! Scripted ring scenarios.
//!
//! A scenario is a ring configuration plus a list of steps, e.g.
//!
//! ```json
//! {
//!   "bits": 5,
//!   "finger_selection": "numeric",
//!   "steps": [{"join": [12, 18]}, {"add": [24, 16]}, "print", {"leave": [12]}]
//! }
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use corelib::ring::HashRing;
use corelib::{Id, RingConfig};
use serde::{Deserialize, Serialize};
use tracing::info;

/// One step of a scenario.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Join(Vec<Id>),
    Add(Vec<Id>),
    Leave(Vec<Id>),
    Lookup(Vec<Id>),
    Print,
}

impl Step {
    /// True for a join, add, leave or lookup step without ids.
    pub fn is_empty(&self) -> bool {
        match self {
            Step::Join(ids) | Step::Add(ids) | Step::Leave(ids) | Step::Lookup(ids) => ids.is_empty(),
            Step::Print => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(flatten)]
    pub ring: RingConfig,
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Joins, then adds, then leaves, then prints.
    pub fn from_phases(ring: RingConfig, join: Vec<Id>, add: Vec<Id>, leave: Vec<Id>) -> Self {
        let steps = [Step::Join(join), Step::Add(add), Step::Leave(leave)]
            .into_iter()
            .filter(|step| !step.is_empty())
            .chain([Step::Print])
            .collect();
        Self { ring, steps }
    }

    /// The reference scenario: two nodes take nine resources, three more
    /// nodes join and rebalance them, then node 12 is asked to leave.
    pub fn reference(ring: RingConfig) -> Self {
        Self {
            ring,
            steps: vec![
                Step::Join(vec![12, 18]),
                Step::Add(vec![24, 21, 16, 23, 2, 29, 28, 7, 10]),
                Step::Print,
                Step::Join(vec![5, 27, 30]),
                Step::Print,
                Step::Leave(vec![12]),
                Step::Print,
            ],
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing scenario {}", path.display()))
    }

    /// Replays every step against a fresh ring and returns the printed
    /// output, one entry per line or block.
    pub fn run(&self, json: bool) -> Result<Vec<String>> {
        let mut ring: HashRing = HashRing::with_config(self.ring).context("building ring")?;
        let mut output = Vec::new();

        for step in &self.steps {
            match step {
                Step::Join(ids) => {
                    for &id in ids {
                        let joined = ring
                            .join(id)
                            .with_context(|| format!("joining node {id}"))?;
                        if !joined {
                            output.push(format!("Node {id} is outside the ring"));
                        }
                    }
                }
                Step::Add(ids) => {
                    for &id in ids {
                        if ring.add_resource(id).is_none() {
                            if ring.is_empty() {
                                output.push("Can't add a resource to an empty hashring.".to_string());
                            } else {
                                output.push(format!("Resource {id} is outside the ring"));
                            }
                        }
                    }
                }
                Step::Leave(ids) => {
                    for &id in ids {
                        if !ring.leave(id) {
                            output.push(format!("Nothing to remove at {id}"));
                        }
                    }
                }
                Step::Lookup(ids) => {
                    for &id in ids {
                        output.push(describe_lookup(&ring, id));
                    }
                }
                Step::Print => {
                    if json {
                        output.push(serde_json::to_string_pretty(&ring.snapshot())?);
                    } else {
                        output.push(ring.to_string());
                    }
                }
            }
        }

        info!(
            selection = self.ring.finger_selection.name(),
            steps = self.steps.len(),
            nodes = ring.len(),
            resources = ring.resource_count(),
            "scenario complete"
        );
        Ok(output)
    }
}

fn describe_lookup(ring: &HashRing, id: Id) -> String {
    match (ring.trace_lookup(id), ring.lookup_plain(id)) {
        (Some(trace), Some(plain)) => format!(
            "Lookup {id}: node {} ({} hops, {:?}), successor by ring walk: node {plain}",
            trace.owner, trace.hops, trace.mode
        ),
        _ => format!("Lookup {id}: no owner"),
    }
}
