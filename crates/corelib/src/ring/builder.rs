//! Builder for pre-populated rings.

use crate::config::RingConfig;
use crate::error::Result;
use crate::finger::FingerSelection;
use crate::ring::ring::HashRing;
use crate::space::Id;

/// Collects a configuration, initial members and initial resources, then
/// applies them in that order.
///
/// ```rust
/// use corelib::ring::RingBuilder;
///
/// let ring = RingBuilder::new(5)
///     .add_nodes([12, 18])
///     .add_resources([16, 24])
///     .build()
///     .unwrap();
/// assert_eq!(ring.holder(16).map(|id| id.0), Some(18));
/// ```
#[derive(Clone, Debug)]
pub struct RingBuilder {
    config: RingConfig,
    nodes: Vec<Id>,
    resources: Vec<Id>,
}

impl RingBuilder {
    pub fn new(bits: u32) -> Self {
        Self::from_config(RingConfig::new(bits))
    }

    pub fn from_config(config: RingConfig) -> Self {
        Self {
            config,
            nodes: Vec::new(),
            resources: Vec::new(),
        }
    }

    pub fn finger_selection(mut self, selection: FingerSelection) -> Self {
        self.config.finger_selection = selection;
        self
    }

    pub fn add_node(mut self, id: Id) -> Self {
        self.nodes.push(id);
        self
    }

    pub fn add_nodes(mut self, ids: impl IntoIterator<Item = Id>) -> Self {
        self.nodes.extend(ids);
        self
    }

    pub fn add_resource(mut self, id: Id) -> Self {
        self.resources.push(id);
        self
    }

    pub fn add_resources(mut self, ids: impl IntoIterator<Item = Id>) -> Self {
        self.resources.extend(ids);
        self
    }

    /// Builds a ring with `String` payloads.
    pub fn build(self) -> Result<HashRing> {
        self.build_with()
    }

    /// Builds a ring whose resources carry `V::default()` payloads.
    pub fn build_with<V: Default>(self) -> Result<HashRing<V>> {
        let mut ring = HashRing::with_config(self.config)?;
        ring.join_all(self.nodes)?;
        ring.add_resources(self.resources);
        Ok(ring)
    }
}
