//! Identifier space of the ring.
//!
//! Node positions and resource keys share one modular space of `2^k`
//! identifiers. All distances are measured clockwise, so `distance(a, b)` and
//! `distance(b, a)` differ unless `a == b`.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Raw identifier in the space: a node position or a resource key.
pub type Id = u64;

/// Widest identifier space that still fits every id and distance in a `u64`.
pub const MAX_BITS: u32 = 63;

/// Clockwise number of steps from `a` to `b` in a space of `2^k` ids.
///
/// Both ids are assumed to already lie in `[0, 2^k)`.
#[inline]
pub fn distance(k: u32, a: Id, b: Id) -> u64 {
    if b >= a {
        b - a
    } else {
        (b + (1u64 << k)) - a
    }
}

/// Modular identifier space of width `k` bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct IdSpace {
    bits: u32,
}

impl IdSpace {
    /// Creates a space of `2^bits` identifiers.
    pub fn new(bits: u32) -> Result<Self> {
        if bits == 0 || bits > MAX_BITS {
            return Err(Error::InvalidBits { bits });
        }
        Ok(Self { bits })
    }

    /// Bit width `k`.
    #[inline]
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Number of identifiers, `2^k`.
    #[inline]
    pub fn size(&self) -> u64 {
        1u64 << self.bits
    }

    /// Largest legal identifier, `2^k - 1`.
    #[inline]
    pub fn max_id(&self) -> Id {
        self.size() - 1
    }

    /// True if `id` lies in the legal range `[0, 2^k)`.
    #[inline]
    pub fn contains(&self, id: Id) -> bool {
        id < self.size()
    }

    /// Reduces an arbitrary value into the space.
    #[inline]
    pub fn wrap(&self, x: u64) -> Id {
        x & self.max_id()
    }

    /// Clockwise distance from `a` to `b`.
    #[inline]
    pub fn distance(&self, a: Id, b: Id) -> u64 {
        distance(self.bits, a, b)
    }

    /// Finger probes of `id`: `(id + 2^i) mod 2^k` for `i` in `[0, k)`, in
    /// ascending `i`.
    pub fn probes(&self, id: Id) -> impl Iterator<Item = Id> + '_ {
        (0..self.bits).map(move |i| self.wrap(id + (1u64 << i)))
    }
}

impl TryFrom<u32> for IdSpace {
    type Error = Error;

    fn try_from(bits: u32) -> Result<Self> {
        Self::new(bits)
    }
}

impl From<IdSpace> for u32 {
    fn from(space: IdSpace) -> Self {
        space.bits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_known_values() {
        assert_eq!(distance(5, 29, 5), 8);
        assert_eq!(distance(5, 29, 12), 15);
        assert_eq!(distance(5, 5, 29), 24);
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        for a in 0..32 {
            assert_eq!(distance(5, a, a), 0);
        }
    }

    #[test]
    fn test_distance_at_widest_space() {
        let max = (1u64 << MAX_BITS) - 1;
        assert_eq!(distance(MAX_BITS, max, 0), 1);
        assert_eq!(distance(MAX_BITS, 0, max), max);
    }

    #[test]
    fn test_space_bounds() {
        let space = IdSpace::new(5).unwrap();
        assert_eq!(space.size(), 32);
        assert_eq!(space.max_id(), 31);
        assert!(space.contains(0));
        assert!(space.contains(31));
        assert!(!space.contains(32));
    }

    #[test]
    fn test_invalid_bits() {
        assert_eq!(IdSpace::new(0), Err(Error::InvalidBits { bits: 0 }));
        assert_eq!(IdSpace::new(64), Err(Error::InvalidBits { bits: 64 }));
        assert!(IdSpace::new(1).is_ok());
        assert!(IdSpace::new(MAX_BITS).is_ok());
    }

    #[test]
    fn test_probes_wrap_around() {
        let space = IdSpace::new(5).unwrap();
        let probes: Vec<Id> = space.probes(30).collect();
        assert_eq!(probes, vec![31, 0, 2, 6, 14]);

        let probes: Vec<Id> = space.probes(5).collect();
        assert_eq!(probes, vec![6, 7, 9, 13, 21]);
    }

    #[test]
    fn test_serde_rejects_invalid_bits() {
        let space: IdSpace = serde_json::from_str("5").unwrap();
        assert_eq!(space.bits(), 5);
        assert!(serde_json::from_str::<IdSpace>("0").is_err());
    }
}
