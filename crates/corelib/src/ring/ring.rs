//! Hash ring data structure.
//!
//! The ring is a circular doubly-linked list of nodes stored in an arena and
//! anchored at `head`, the member with the smallest id. `head` is only an
//! iteration anchor; ownership never depends on it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::RingConfig;
use crate::error::{Error, Result};
use crate::finger::{self, FingerEntry, FingerSelection};
use crate::migration::MigrationMode;
use crate::node::{Node, NodeId, NodeIdx};
use crate::space::{Id, IdSpace};

/// Lookup strategy currently in effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupMode {
    /// No finger tables yet; lookups walk the ring node by node.
    Cold,
    /// Finger tables are built; lookups hop through them.
    Warm,
}

/// In-memory Chord ring over a `2^k` identifier space.
///
/// `V` is the opaque payload stored with every resource.
///
/// The ring does no locking of its own: every mutation takes `&mut self`.
/// Hosts that share a ring between threads wrap it in
/// [`SharedRing`](crate::shared::SharedRing).
#[derive(Debug)]
pub struct HashRing<V = String> {
    pub(crate) space: IdSpace,
    pub(crate) selection: FingerSelection,
    pub(crate) slots: Vec<Option<Node<V>>>,
    free: Vec<NodeIdx>,
    pub(crate) head: Option<NodeIdx>,
    len: usize,
    mode: LookupMode,
    /// Which node currently holds each resource.
    pub(crate) holders: HashMap<Id, NodeIdx>,
}

impl<V> HashRing<V> {
    /// Creates an empty ring over `2^bits` identifiers using the default
    /// finger selection.
    pub fn new(bits: u32) -> Result<Self> {
        Self::with_config(RingConfig::new(bits))
    }

    /// Creates an empty ring from a validated configuration.
    pub fn with_config(config: RingConfig) -> Result<Self> {
        let space = config.validate()?;
        Ok(Self {
            space,
            selection: config.finger_selection,
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            len: 0,
            mode: LookupMode::Cold,
            holders: HashMap::new(),
        })
    }

    pub fn space(&self) -> &IdSpace {
        &self.space
    }

    pub fn finger_selection(&self) -> FingerSelection {
        self.selection
    }

    pub fn mode(&self) -> LookupMode {
        self.mode
    }

    /// Number of member nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Member with the smallest id.
    pub fn head(&self) -> Option<NodeId> {
        self.head.map(|idx| self.node(idx).id)
    }

    /// Number of resources held across all nodes.
    pub fn resource_count(&self) -> usize {
        self.holders.len()
    }

    // ------------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------------

    /// Owner of `id` according to the active lookup strategy.
    ///
    /// Returns `None` if the ring is empty or `id` is outside the legal range.
    /// While the ring is warm the answer comes from the finger walk, which
    /// with [`FingerSelection::Numeric`] may differ from the true successor.
    pub fn lookup(&self, id: Id) -> Option<NodeId> {
        self.find(id).map(|idx| self.node(idx).id)
    }

    /// True successor of `id`, always computed with the plain walk.
    pub fn lookup_plain(&self, id: Id) -> Option<NodeId> {
        if !self.space.contains(id) {
            return None;
        }
        self.plain_walk(id).map(|idx| self.node(idx).id)
    }

    /// True if a node with exactly this id is a member.
    pub fn contains_node(&self, id: Id) -> bool {
        self.lookup_plain(id) == Some(NodeId(id))
    }

    pub(crate) fn find(&self, id: Id) -> Option<NodeIdx> {
        if !self.space.contains(id) {
            return None;
        }
        match self.mode {
            LookupMode::Cold => self.plain_walk(id),
            LookupMode::Warm => self.finger_walk(id),
        }
    }

    // ------------------------------------------------------------------------
    // Membership
    // ------------------------------------------------------------------------

    /// Adds a node at `id`.
    ///
    /// Returns `Ok(false)` without touching the ring if `id` is outside the
    /// legal range, and [`Error::DuplicateNode`] if a node already sits at
    /// `id`. On success the new node takes over the resources it is now the
    /// closer owner of, and every finger table is rebuilt.
    pub fn join(&mut self, id: Id) -> Result<bool> {
        if !self.space.contains(id) {
            debug!(id, max = self.space.max_id(), "join ignored: id out of range");
            return Ok(false);
        }
        let node_id = NodeId(id);

        match self.plain_walk(id) {
            None => {
                let idx = self.alloc(node_id);
                self.head = Some(idx);
                info!(node = id, "adding head node");
            }
            Some(successor) => {
                if self.node(successor).id == node_id {
                    return Err(Error::DuplicateNode { id: node_id });
                }
                let idx = self.alloc(node_id);
                let previous = self.node(successor).previous;
                {
                    let node = self.node_mut(idx);
                    node.next = successor;
                    node.previous = previous;
                }
                self.node_mut(previous).next = idx;
                self.node_mut(successor).previous = idx;

                if let Some(head) = self.head {
                    if node_id < self.node(head).id {
                        self.head = Some(idx);
                    }
                }

                let moved = self.migrate(successor, idx, MigrationMode::Rebalance);
                info!(
                    node = id,
                    previous = self.node(previous).id.0,
                    next = self.node(successor).id.0,
                    moved,
                    "adding node"
                );
            }
        }

        self.rebuild_fingers();
        Ok(true)
    }

    /// Joins every id in order, stopping at the first error.
    ///
    /// Returns how many nodes actually joined.
    pub fn join_all(&mut self, ids: impl IntoIterator<Item = Id>) -> Result<usize> {
        let mut joined = 0;
        for id in ids {
            if self.join(id)? {
                joined += 1;
            }
        }
        Ok(joined)
    }

    /// Removes the node at `id`, handing all of its resources to its
    /// successor.
    ///
    /// The node is located with the active lookup strategy; if that does not
    /// land on a node with exactly this id nothing is removed and `false` is
    /// returned. When the last node leaves its resources have nowhere to go
    /// and are dropped.
    pub fn leave(&mut self, id: Id) -> bool {
        let Some(target) = self
            .find(id)
            .filter(|&idx| self.node(idx).id == NodeId(id))
        else {
            debug!(id, "nothing to remove");
            return false;
        };

        let successor = self.node(target).next;
        let previous = self.node(target).previous;

        if successor == target {
            let dropped = self.node(target).resources.len();
            self.holders.clear();
            self.head = None;
            self.release(target);
            if dropped > 0 {
                warn!(node = id, dropped, "last node left; its resources were dropped");
            }
            info!(node = id, "removing the last node");
        } else {
            let moved = self.migrate(target, successor, MigrationMode::Drain);
            self.node_mut(previous).next = successor;
            self.node_mut(successor).previous = previous;
            if self.head == Some(target) {
                self.head = Some(successor);
            }
            self.release(target);
            info!(
                node = id,
                successor = self.node(successor).id.0,
                moved,
                "removing node"
            );
        }

        self.rebuild_fingers();
        true
    }

    // ------------------------------------------------------------------------
    // Resources
    // ------------------------------------------------------------------------

    /// Stores `payload` under `resource` at the node that owns it.
    ///
    /// Returns the owner, or `None` if the id is outside the legal range or
    /// the ring is empty. A resource already held by another node is moved,
    /// so no resource is ever held twice.
    pub fn insert_resource(&mut self, resource: Id, payload: V) -> Option<NodeId> {
        if !self.space.contains(resource) {
            debug!(resource, "resource ignored: id out of range");
            return None;
        }
        let Some(owner) = self.find(resource) else {
            debug!(resource, "can't add a resource to an empty ring");
            return None;
        };

        if let Some(&holder) = self.holders.get(&resource) {
            if holder != owner {
                self.node_mut(holder).resources.remove(&resource);
            }
        }
        self.node_mut(owner).resources.insert(resource, payload);
        self.holders.insert(resource, owner);

        let owner = self.node(owner).id;
        debug!(resource, owner = owner.0, "adding resource");
        Some(owner)
    }

    /// Node currently holding `resource`, if any.
    pub fn holder(&self, resource: Id) -> Option<NodeId> {
        self.holders.get(&resource).map(|&idx| self.node(idx).id)
    }

    /// Payload stored under `resource`.
    pub fn resource(&self, resource: Id) -> Option<&V> {
        let idx = *self.holders.get(&resource)?;
        self.node(idx).resources.get(&resource)
    }

    /// Resolved finger table of the node at `id`, in ascending `i`.
    ///
    /// `None` if no such node is a member; empty while the ring is cold.
    pub fn fingers(&self, id: Id) -> Option<Vec<FingerEntry>> {
        let idx = self
            .plain_walk(id)
            .filter(|&idx| self.node(idx).id == NodeId(id))?;
        Some(self.finger_entries(idx))
    }

    pub(crate) fn finger_entries(&self, idx: NodeIdx) -> Vec<FingerEntry> {
        self.node(idx)
            .fingers
            .iter()
            .map(|finger| FingerEntry {
                start: finger.start,
                node: self.node(finger.node).id,
            })
            .collect()
    }

    // ------------------------------------------------------------------------
    // Arena
    // ------------------------------------------------------------------------

    pub(crate) fn node(&self, idx: NodeIdx) -> &Node<V> {
        match &self.slots[idx.0] {
            Some(node) => node,
            None => panic!("arena slot {} is vacant", idx.0),
        }
    }

    pub(crate) fn node_mut(&mut self, idx: NodeIdx) -> &mut Node<V> {
        match &mut self.slots[idx.0] {
            Some(node) => node,
            None => panic!("arena slot {} is vacant", idx.0),
        }
    }

    /// Mutable access to two distinct live slots at once.
    pub(crate) fn pair_mut(&mut self, a: NodeIdx, b: NodeIdx) -> (&mut Node<V>, &mut Node<V>) {
        assert_ne!(a, b, "pair_mut needs two distinct slots");
        let (low, high, swapped) = if a.0 < b.0 {
            (a.0, b.0, false)
        } else {
            (b.0, a.0, true)
        };
        let (left, right) = self.slots.split_at_mut(high);
        let (Some(first), Some(second)) = (left[low].as_mut(), right[0].as_mut()) else {
            panic!("arena slot {} or {} is vacant", a.0, b.0);
        };
        if swapped {
            (second, first)
        } else {
            (first, second)
        }
    }

    fn alloc(&mut self, id: NodeId) -> NodeIdx {
        let idx = match self.free.pop() {
            Some(idx) => idx,
            None => {
                self.slots.push(None);
                NodeIdx(self.slots.len() - 1)
            }
        };
        self.slots[idx.0] = Some(Node::new(id, idx));
        self.len += 1;
        idx
    }

    fn release(&mut self, idx: NodeIdx) {
        self.slots[idx.0] = None;
        self.free.push(idx);
        self.len -= 1;
    }

    /// Arena indices in ring order starting at `head`.
    pub(crate) fn ring_order(&self) -> Vec<NodeIdx> {
        let mut order = Vec::with_capacity(self.len);
        let Some(head) = self.head else {
            return order;
        };
        let mut curr = head;
        loop {
            order.push(curr);
            curr = self.node(curr).next;
            if curr == head {
                break;
            }
        }
        order
    }

    /// Rebuilds the finger table of every member and switches lookups to
    /// the finger walk.
    pub(crate) fn rebuild_fingers(&mut self) {
        let tables: Vec<_> = self
            .ring_order()
            .into_iter()
            .map(|idx| (idx, finger::build_table(self, idx)))
            .collect();

        for (idx, table) in tables {
            debug!(node = self.node(idx).id.0, fingers = table.len(), "finger table complete");
            self.node_mut(idx).fingers = table;
        }
        self.mode = LookupMode::Warm;
    }
}

impl<V: Default> HashRing<V> {
    /// Adds `resource` with a default payload.
    ///
    /// See [`HashRing::insert_resource`].
    pub fn add_resource(&mut self, resource: Id) -> Option<NodeId> {
        self.insert_resource(resource, V::default())
    }

    /// Adds every resource in order; returns how many were stored.
    pub fn add_resources(&mut self, resources: impl IntoIterator<Item = Id>) -> usize {
        resources
            .into_iter()
            .filter(|&resource| self.add_resource(resource).is_some())
            .count()
    }
}
