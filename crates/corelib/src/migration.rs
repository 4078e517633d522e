//! Resource migration between neighbouring nodes.
//!
//! Runs on every topology change: a joining node pulls the resources it now
//! owns from its successor, and a leaving node hands everything to its
//! successor. Resources are moved, never copied.

use tracing::debug;

use crate::node::{Node, NodeIdx};
use crate::ring::HashRing;
use crate::space::{Id, IdSpace};

/// Which of the origin's resources a migration moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MigrationMode {
    /// Only resources the destination is now strictly closer to, measured
    /// clockwise from the resource. Used when a node joins.
    Rebalance,
    /// Everything. Used when the origin leaves.
    Drain,
}

/// Resource ids `origin` must hand to `destination`, in ascending order.
pub(crate) fn resources_to_move<V>(
    space: &IdSpace,
    origin: &Node<V>,
    destination: &Node<V>,
    mode: MigrationMode,
) -> Vec<Id> {
    let mut ids: Vec<Id> = origin
        .resources
        .keys()
        .copied()
        .filter(|&resource| match mode {
            MigrationMode::Drain => true,
            MigrationMode::Rebalance => {
                space.distance(resource, destination.id.0) < space.distance(resource, origin.id.0)
            }
        })
        .collect();
    ids.sort_unstable();
    ids
}

impl<V> HashRing<V> {
    /// Moves the selected resources of `origin` to `destination`.
    ///
    /// Each resource leaves the origin and lands in the destination in one
    /// step, and the holder index follows it. Returns how many moved.
    pub(crate) fn migrate(
        &mut self,
        origin: NodeIdx,
        destination: NodeIdx,
        mode: MigrationMode,
    ) -> usize {
        if origin == destination {
            return 0;
        }
        let ids = resources_to_move(&self.space, self.node(origin), self.node(destination), mode);

        let (from, to) = self.pair_mut(origin, destination);
        let (from_id, to_id) = (from.id, to.id);
        for &resource in &ids {
            if let Some(payload) = from.resources.remove(&resource) {
                to.resources.insert(resource, payload);
            }
        }
        for &resource in &ids {
            debug!(resource, from = from_id.0, to = to_id.0, "moving resource");
            self.holders.insert(resource, destination);
        }
        ids.len()
    }
}
