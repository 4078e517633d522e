//! Read-only views over the ring.
//!
//! [`Members`] walks the ring clockwise from `head`; [`RingSnapshot`] is a
//! serializable picture of the same walk for diagnostics. Neither is ever
//! fed back into a ring.

use std::fmt;
use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};

use crate::finger::{FingerEntry, FingerSelection};
use crate::node::{NodeId, NodeIdx};
use crate::ring::ring::{HashRing, LookupMode};
use crate::space::Id;

/// Clockwise walk over ring members starting at `head`.
///
/// Yields each node id with its resource ids in ascending order.
pub struct Members<'a, V> {
    ring: &'a HashRing<V>,
    head: Option<NodeIdx>,
    next: Option<NodeIdx>,
}

impl<'a, V> Iterator for Members<'a, V> {
    type Item = (NodeId, Vec<Id>);

    fn next(&mut self) -> Option<Self::Item> {
        let curr = self.next?;
        let node = self.ring.node(curr);
        self.next = Some(node.next).filter(|&next| Some(next) != self.head);
        Some((node.id, node.sorted_resources()))
    }
}

impl<V> FusedIterator for Members<'_, V> {}

/// One member in a [`RingSnapshot`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSnapshot {
    pub id: NodeId,
    pub resources: Vec<Id>,
    pub fingers: Vec<FingerEntry>,
}

/// Point-in-time picture of a ring, in clockwise order from `head`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingSnapshot {
    pub bits: u32,
    pub finger_selection: FingerSelection,
    pub mode: LookupMode,
    pub members: Vec<MemberSnapshot>,
}

impl<V> HashRing<V> {
    /// Members in clockwise order from `head`. Empty for an empty ring.
    ///
    /// Each call starts a fresh walk.
    pub fn members(&self) -> Members<'_, V> {
        Members {
            ring: self,
            head: self.head,
            next: self.head,
        }
    }

    /// Member ids in clockwise order from `head`.
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.members().map(|(id, _)| id).collect()
    }

    pub fn snapshot(&self) -> RingSnapshot {
        let members = self
            .ring_order()
            .into_iter()
            .map(|idx| {
                let node = self.node(idx);
                MemberSnapshot {
                    id: node.id,
                    resources: node.sorted_resources(),
                    fingers: self.finger_entries(idx),
                }
            })
            .collect();

        RingSnapshot {
            bits: self.space.bits(),
            finger_selection: self.selection,
            mode: self.mode(),
            members,
        }
    }
}

/// Renders the ring one member per line between `*****` rulers.
impl<V> fmt::Display for HashRing<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "*****")?;
        writeln!(f, "Printing the hashring in clockwise order:")?;
        if self.is_empty() {
            writeln!(f, "Empty hashring")?;
        }
        for (id, resources) in self.members() {
            write!(f, "Node: {id}, Resources:")?;
            if resources.is_empty() {
                write!(f, " Empty")?;
            }
            for resource in resources {
                write!(f, " {resource}")?;
            }
            writeln!(f)?;
        }
        write!(f, "*****")
    }
}
