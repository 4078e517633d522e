//! Successor search.
//!
//! Both walks start at `head` and hop towards the node with the smallest
//! clockwise distance to the target, advancing only while that distance
//! strictly shrinks. The node reached is the target's owner if its id equals
//! the target; otherwise the owner is one step further.

use serde::{Deserialize, Serialize};

use crate::finger::FingerSelection;
use crate::node::{NodeId, NodeIdx};
use crate::ring::ring::{HashRing, LookupMode};
use crate::space::Id;

/// Result of a lookup together with the number of hops it took.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupTrace {
    pub owner: NodeId,
    pub hops: usize,
    pub mode: LookupMode,
}

impl<V> HashRing<V> {
    /// Like [`HashRing::lookup`], but also reports how many hops the active
    /// walk made.
    pub fn trace_lookup(&self, id: Id) -> Option<LookupTrace> {
        if !self.space.contains(id) {
            return None;
        }
        let (idx, hops) = match self.mode() {
            LookupMode::Cold => self.walk_plain(id)?,
            LookupMode::Warm => self.walk_fingers(id)?,
        };
        Some(LookupTrace {
            owner: self.node(idx).id,
            hops,
            mode: self.mode(),
        })
    }

    /// Successor of `target` found by following `next` links.
    ///
    /// O(n) hops in the worst case. `None` only for an empty ring.
    pub(crate) fn plain_walk(&self, target: Id) -> Option<NodeIdx> {
        self.walk_plain(target).map(|(idx, _)| idx)
    }

    /// Successor of `target` found by hopping through finger tables.
    pub(crate) fn finger_walk(&self, target: Id) -> Option<NodeIdx> {
        self.walk_fingers(target).map(|(idx, _)| idx)
    }

    fn walk_plain(&self, target: Id) -> Option<(NodeIdx, usize)> {
        let dist = |idx: NodeIdx| self.space.distance(self.node(idx).id.0, target);

        let mut curr = self.head?;
        let mut next = self.node(curr).next;
        let mut hops = 0;
        while dist(curr) > dist(next) {
            curr = next;
            next = self.node(next).next;
            hops += 1;
        }

        if self.node(curr).id.0 == target {
            Some((curr, hops))
        } else {
            Some((next, hops))
        }
    }

    fn walk_fingers(&self, target: Id) -> Option<(NodeIdx, usize)> {
        let dist = |idx: NodeIdx| self.space.distance(self.node(idx).id.0, target);

        let mut curr = self.head?;
        let mut next = self.next_hop(curr, target);
        let mut hops = 0;
        while dist(curr) > dist(next) {
            curr = next;
            next = self.next_hop(curr, target);
            hops += 1;
        }

        if self.node(curr).id.0 == target {
            return Some((curr, hops));
        }
        match self.selection {
            FingerSelection::Numeric => Some((next, hops)),
            FingerSelection::Clockwise => Some((self.node(curr).next, hops)),
        }
    }

    /// Next candidate from `curr`'s finger table, falling back to the ring
    /// link if the table is empty.
    fn next_hop(&self, curr: NodeIdx, target: Id) -> NodeIdx {
        let node = self.node(curr);
        let candidate = match self.selection {
            FingerSelection::Numeric => node.fingers.numeric_candidate(target),
            FingerSelection::Clockwise => node.fingers.clockwise_candidate(|idx| {
                self.space.distance(self.node(idx).id.0, target)
            }),
        };
        candidate.unwrap_or(node.next)
    }
}
