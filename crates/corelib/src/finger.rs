//! Finger tables.
//!
//! A finger table maps the probes `(id + 2^i) mod 2^k` of a node to the
//! nodes currently succeeding them. Tables are a cache over the ring: they
//! are always rebuilt from scratch with the plain walk and never patched.

use serde::{Deserialize, Serialize};

use crate::node::{NodeId, NodeIdx};
use crate::ring::HashRing;
use crate::space::Id;

/// How the finger walk picks the next hop from a finger table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FingerSelection {
    /// Finger whose probe is numerically closest to the target, ignoring
    /// wraparound. Lookups may resolve to the wrong node near the wrap and
    /// can degrade to a linear number of hops.
    #[default]
    Numeric,
    /// Finger whose node is closest to the target clockwise. Always agrees
    /// with the plain walk and needs O(log n) hops.
    Clockwise,
}

impl FingerSelection {
    pub fn name(&self) -> &'static str {
        match self {
            FingerSelection::Numeric => "numeric",
            FingerSelection::Clockwise => "clockwise",
        }
    }
}

/// One resolved finger, as exposed to callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FingerEntry {
    /// Probe id, `(node + 2^i) mod 2^k`.
    pub start: Id,
    /// Successor of `start` at the time the table was built.
    pub node: NodeId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Finger {
    pub(crate) start: Id,
    pub(crate) node: NodeIdx,
}

/// Fingers of one node, in ascending `i`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct FingerTable {
    entries: Vec<Finger>,
}

impl FingerTable {
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Finger> {
        self.entries.iter()
    }

    /// Finger whose probe has the smallest absolute difference to `target`.
    /// The earliest entry wins ties.
    pub(crate) fn numeric_candidate(&self, target: Id) -> Option<NodeIdx> {
        self.entries
            .iter()
            .min_by_key(|finger| finger.start.abs_diff(target))
            .map(|finger| finger.node)
    }

    /// Finger whose node has the smallest `distance_to_target`. The earliest
    /// entry wins ties.
    pub(crate) fn clockwise_candidate(
        &self,
        distance_to_target: impl Fn(NodeIdx) -> u64,
    ) -> Option<NodeIdx> {
        self.entries
            .iter()
            .min_by_key(|finger| distance_to_target(finger.node))
            .map(|finger| finger.node)
    }
}

/// Builds the finger table of `node`, resolving every probe with the plain
/// walk so that no other (possibly stale) finger table is consulted.
///
/// `node` must be a live member of a non-empty ring.
pub(crate) fn build_table<V>(ring: &HashRing<V>, node: NodeIdx) -> FingerTable {
    let id = ring.node(node).id.0;
    let entries = ring
        .space()
        .probes(id)
        .filter_map(|start| ring.plain_walk(start).map(|node| Finger { start, node }))
        .collect();
    FingerTable { entries }
}
