//! Core library for the Chord ring simulator.
//!
//! This crate provides an in-memory model of a Chord-style ring:
//! - Modular identifier space and clockwise distance
//! - Nodes kept in a circular doubly-linked arena
//! - Successor lookup, plain and finger-accelerated
//! - Resource migration when nodes join or leave
//! - Finger table construction
//! - Read-only traversal and diagnostic snapshots

pub mod config;
pub mod error;
pub mod finger;
pub mod migration;
pub mod node;
pub mod ring;
pub mod shared;
pub mod space;

pub use config::RingConfig;
pub use error::{Error, Result};
pub use finger::{FingerEntry, FingerSelection};
pub use node::NodeId;
pub use ring::{HashRing, LookupMode, Ring, RingBuilder, RingSnapshot};
pub use shared::SharedRing;
pub use space::{distance, Id, IdSpace};
