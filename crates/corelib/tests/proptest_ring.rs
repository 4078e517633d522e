//! Property-based tests for the ring.
//!
//! Uses proptest to generate random join/leave/add sequences and verify the
//! ring invariants after every step.

use std::collections::HashSet;

use proptest::prelude::*;

use corelib::finger::FingerSelection;
use corelib::node::NodeId;
use corelib::ring::HashRing;
use corelib::{distance, RingConfig};

#[derive(Clone, Debug)]
enum Op {
    Join(u64),
    Leave(u64),
    Add(u64),
}

/// Ids deliberately run past `2^bits` so out-of-range inputs are exercised.
fn any_op(bits: u32) -> impl Strategy<Value = Op> {
    let bound = (1u64 << bits) + 4;
    prop_oneof![
        3 => (0..bound).prop_map(Op::Join),
        1 => (0..bound).prop_map(Op::Leave),
        4 => (0..bound).prop_map(Op::Add),
    ]
}

fn any_selection() -> impl Strategy<Value = FingerSelection> {
    prop_oneof![Just(FingerSelection::Numeric), Just(FingerSelection::Clockwise)]
}

fn apply(ring: &mut HashRing, op: &Op) {
    match *op {
        Op::Join(id) => {
            let _ = ring.join(id);
        }
        Op::Leave(id) => {
            ring.leave(id);
        }
        Op::Add(id) => {
            ring.add_resource(id);
        }
    }
}

fn assert_structure(ring: &HashRing) {
    let space = *ring.space();
    let ids = ring.node_ids();
    assert_eq!(ids.len(), ring.len());
    assert_eq!(ring.head(), ids.first().copied());
    assert!(ids.windows(2).all(|w| w[0] < w[1]), "ids not increasing: {ids:?}");

    let mut seen = HashSet::new();
    for (node, resources) in ring.members() {
        for r in resources {
            assert!(space.contains(r));
            assert!(seen.insert(r), "resource {r} held twice");
            assert_eq!(ring.holder(r), Some(node));
        }
        let starts: Vec<u64> = ring.fingers(node.0).unwrap().iter().map(|f| f.start).collect();
        assert_eq!(starts, space.probes(node.0).collect::<Vec<_>>());
    }
    assert_eq!(seen.len(), ring.resource_count());
}

proptest! {
    /// Property: distance stays inside the space and is zero only to itself.
    #[test]
    fn distance_law(bits in 1u32..=63, a in any::<u64>(), b in any::<u64>()) {
        let mask = (1u64 << bits) - 1;
        let (a, b) = (a & mask, b & mask);
        let d = distance(bits, a, b);
        prop_assert!(d <= mask);
        prop_assert_eq!(distance(bits, a, a), 0);
        prop_assert_eq!(d == 0, a == b);
        if a != b {
            prop_assert_eq!(d + distance(bits, b, a), 1u64 << bits);
        }
    }

    /// Property: structural invariants hold after every operation, whatever
    /// the finger selection.
    #[test]
    fn structure_holds(
        selection in any_selection(),
        ops in prop::collection::vec(any_op(6), 1..60),
    ) {
        let config = RingConfig::new(6).with_finger_selection(selection);
        let mut ring: HashRing = HashRing::with_config(config).unwrap();
        for op in &ops {
            apply(&mut ring, op);
            assert_structure(&ring);
        }
    }

    /// Property: with clockwise fingers every lookup is the true successor
    /// and every resource sits at its successor.
    #[test]
    fn successor_ownership(ops in prop::collection::vec(any_op(6), 1..60)) {
        let config = RingConfig::new(6).with_finger_selection(FingerSelection::Clockwise);
        let mut ring: HashRing = HashRing::with_config(config).unwrap();
        for op in &ops {
            apply(&mut ring, op);
        }

        let nodes: Vec<u64> = ring.node_ids().into_iter().map(|id| id.0).collect();
        for r in 0..64u64 {
            let expected = nodes.iter().copied().find(|&n| n >= r).or_else(|| nodes.first().copied());
            prop_assert_eq!(ring.lookup(r), expected.map(NodeId));
        }
        for (node, resources) in ring.members() {
            for r in resources {
                prop_assert_eq!(ring.lookup(r), Some(node));
            }
        }
    }

    /// Property: once a node leaves, lookups of its id go to its former
    /// successor.
    #[test]
    fn leave_then_lookup(nodes in prop::collection::btree_set(0u64..64, 2..12), pick in any::<prop::sample::Index>()) {
        let config = RingConfig::new(6).with_finger_selection(FingerSelection::Clockwise);
        let mut ring: HashRing = HashRing::with_config(config).unwrap();
        ring.join_all(nodes.iter().copied()).unwrap();

        let ordered: Vec<u64> = nodes.into_iter().collect();
        let i = pick.index(ordered.len());
        let leaving = ordered[i];
        let successor = ordered[(i + 1) % ordered.len()];

        prop_assert!(ring.leave(leaving));
        prop_assert_eq!(ring.lookup(leaving), Some(NodeId(successor)));
    }
}
