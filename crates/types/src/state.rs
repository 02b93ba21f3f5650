// Path: crates/types/src/state.rs

use serde::{Deserialize, Serialize};

/// Values at least this long are committed by hash under [`StateVersion::V1`].
pub const V1_INLINE_THRESHOLD: usize = 33;

/// The layout version of a trie commitment.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StateVersion {
    /// Every value is inlined into its node encoding.
    #[default]
    V0,
    /// Values of [`V1_INLINE_THRESHOLD`] bytes or more are replaced by their hash.
    V1,
}

impl StateVersion {
    /// Whether a value of `len` bytes is stored by hash under this version.
    pub fn hashes_value(self, len: usize) -> bool {
        matches!(self, StateVersion::V1) && len >= V1_INLINE_THRESHOLD
    }
}

impl TryFrom<u32> for StateVersion {
    type Error = String;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(StateVersion::V0),
            1 => Ok(StateVersion::V1),
            other => Err(format!("unknown state version {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v1_hashes_only_long_values() {
        assert!(!StateVersion::V0.hashes_value(1024));
        assert!(!StateVersion::V1.hashes_value(32));
        assert!(StateVersion::V1.hashes_value(33));
    }

    #[test]
    fn rejects_unknown_versions() {
        assert_eq!(StateVersion::try_from(1), Ok(StateVersion::V1));
        assert!(StateVersion::try_from(2).is_err());
    }
}
