//! Ring members.
//!
//! Nodes live in the ring's arena and refer to their neighbours by arena
//! index, so the circular doubly-linked list never needs shared ownership.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::finger::FingerTable;
use crate::space::Id;

/// Position of a node in the identifier space.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub Id);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Id> for NodeId {
    fn from(id: Id) -> Self {
        NodeId(id)
    }
}

/// Stable index of a node slot in the ring's arena.
///
/// Only valid for the ring that issued it, and only until the node leaves.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub(crate) struct NodeIdx(pub(crate) usize);

/// A ring member: its position, the resources it owns, its neighbours and
/// its finger table.
#[derive(Debug)]
pub(crate) struct Node<V> {
    pub(crate) id: NodeId,
    pub(crate) resources: HashMap<Id, V>,
    pub(crate) next: NodeIdx,
    pub(crate) previous: NodeIdx,
    pub(crate) fingers: FingerTable,
}

impl<V> Node<V> {
    /// A detached node linked only to itself.
    pub(crate) fn new(id: NodeId, slot: NodeIdx) -> Self {
        Self {
            id,
            resources: HashMap::new(),
            next: slot,
            previous: slot,
            fingers: FingerTable::default(),
        }
    }

    /// Owned resource ids in ascending order.
    pub(crate) fn sorted_resources(&self) -> Vec<Id> {
        let mut ids: Vec<Id> = self.resources.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}
