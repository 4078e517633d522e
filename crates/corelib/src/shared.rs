//! Thread-shareable ring handle.
//!
//! [`HashRing`] does no locking. `SharedRing` serializes every call through
//! one mutex so a ring can be driven from several threads; each operation
//! still runs to completion before the next one starts.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::Result;
use crate::node::NodeId;
use crate::ring::HashRing;
use crate::space::Id;

/// Cloneable handle to a ring behind a mutex.
#[derive(Debug)]
pub struct SharedRing<V = String> {
    inner: Arc<Mutex<HashRing<V>>>,
}

impl<V> Clone for SharedRing<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> SharedRing<V> {
    pub fn new(ring: HashRing<V>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ring)),
        }
    }

    /// Runs `f` with exclusive access to the ring.
    pub fn with<R>(&self, f: impl FnOnce(&mut HashRing<V>) -> R) -> R {
        let mut ring = self.inner.lock();
        f(&mut ring)
    }

    pub fn lookup(&self, id: Id) -> Option<NodeId> {
        self.inner.lock().lookup(id)
    }

    pub fn join(&self, id: Id) -> Result<bool> {
        self.inner.lock().join(id)
    }

    pub fn leave(&self, id: Id) -> bool {
        self.inner.lock().leave(id)
    }

    pub fn insert_resource(&self, resource: Id, payload: V) -> Option<NodeId> {
        self.inner.lock().insert_resource(resource, payload)
    }
}

impl<V: Default> SharedRing<V> {
    pub fn add_resource(&self, resource: Id) -> Option<NodeId> {
        self.inner.lock().add_resource(resource)
    }
}

impl<V> From<HashRing<V>> for SharedRing<V> {
    fn from(ring: HashRing<V>) -> Self {
        Self::new(ring)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finger::FingerSelection;
    use crate::ring::RingBuilder;
    use std::thread;

    #[test]
    fn test_concurrent_callers_are_serialized() {
        let ring = RingBuilder::new(8)
            .finger_selection(FingerSelection::Clockwise)
            .add_node(0)
            .build()
            .unwrap();
        let shared = SharedRing::new(ring);

        let handles: Vec<_> = (0..4u64)
            .map(|t| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for i in 0..8u64 {
                        shared.join(t * 64 + i * 8 + 1).unwrap();
                        shared.add_resource(t * 64 + i * 8 + 3);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        shared.with(|ring| {
            assert_eq!(ring.len(), 33);
            assert_eq!(ring.resource_count(), 32);
            for (id, resources) in ring.members() {
                for resource in resources {
                    assert_eq!(ring.lookup_plain(resource), Some(id));
                }
            }
        });
    }

    #[test]
    fn test_leave_through_handle() {
        let shared: SharedRing = RingBuilder::new(5).add_nodes([4, 9]).build().unwrap().into();
        assert!(shared.leave(9));
        assert!(!shared.leave(9));
        assert_eq!(shared.lookup(7), Some(NodeId(4)));
    }
}
