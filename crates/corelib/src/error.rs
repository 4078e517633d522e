//! Error types for the core library.

use thiserror::Error;

use crate::node::NodeId;

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the core library.
///
/// Out-of-range ids and leaves of unknown nodes are not errors: those
/// operations are no-ops and report through their return value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Identifier space width outside `1..=63` bits.
    #[error("invalid identifier space: {bits} bits (expected 1..=63)")]
    InvalidBits { bits: u32 },

    /// A node with this id is already a ring member.
    #[error("node {id} is already a member of the ring")]
    DuplicateNode { id: NodeId },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::InvalidBits { bits: 64 };
        assert_eq!(
            err.to_string(),
            "invalid identifier space: 64 bits (expected 1..=63)"
        );

        let err = Error::DuplicateNode { id: NodeId(12) };
        assert_eq!(err.to_string(), "node 12 is already a member of the ring");
    }
}
