//! Ring configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::finger::FingerSelection;
use crate::space::IdSpace;

/// Settings a ring is created from.
///
/// Deserializes from e.g. `{"bits": 5, "finger_selection": "clockwise"}`;
/// `finger_selection` defaults to [`FingerSelection::Numeric`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingConfig {
    /// Width `k` of the identifier space (`2^k` ids).
    pub bits: u32,
    #[serde(default)]
    pub finger_selection: FingerSelection,
}

impl RingConfig {
    pub fn new(bits: u32) -> Self {
        Self {
            bits,
            finger_selection: FingerSelection::default(),
        }
    }

    pub fn with_finger_selection(mut self, selection: FingerSelection) -> Self {
        self.finger_selection = selection;
        self
    }

    /// Checks the settings and returns the identifier space they describe.
    pub fn validate(&self) -> Result<IdSpace> {
        IdSpace::new(self.bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_validate() {
        assert_eq!(RingConfig::new(5).validate().unwrap().size(), 32);
        assert_eq!(
            RingConfig::new(0).validate(),
            Err(Error::InvalidBits { bits: 0 })
        );
    }

    #[test]
    fn test_deserialize_defaults_selection() {
        let config: RingConfig = serde_json::from_str(r#"{"bits": 7}"#).unwrap();
        assert_eq!(config, RingConfig::new(7));

        let config: RingConfig =
            serde_json::from_str(r#"{"bits": 7, "finger_selection": "clockwise"}"#).unwrap();
        assert_eq!(config.finger_selection, FingerSelection::Clockwise);
    }
}
