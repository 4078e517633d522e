//! Chord ring implementation.
//!
//! The ring owns its members, keeps them in clockwise order and routes
//! lookups, joins, leaves and resource placement.

pub mod builder;
pub mod lookup;
pub mod ring;
pub mod topology;

pub use builder::RingBuilder;
pub use lookup::LookupTrace;
pub use ring::{HashRing, LookupMode};
pub use topology::{MemberSnapshot, Members, RingSnapshot};

/// Alias for the main ring type (used by lib.rs).
pub type Ring<V = String> = HashRing<V>;
