// Path: crates/types/src/app.rs

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a signature algorithm in verification requests.
///
/// Values follow the COSE algorithm registry so they stay stable on the wire.
#[derive(
    Serialize, Deserialize, Encode, Decode, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub struct SignatureSuite(pub i32);

impl SignatureSuite {
    /// Ed25519 (EdDSA over Curve25519).
    pub const ED25519: Self = Self(-8);
}

/// A four-byte tag partitioning the keystore (e.g. `b"acco"`, `b"babe"`).
#[derive(
    Serialize, Deserialize, Encode, Decode, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub struct KeyTypeId(pub [u8; 4]);

impl KeyTypeId {
    /// Builds a key type from a little-endian `u32` as passed across the boundary.
    pub fn from_u32_le(raw: u32) -> Self {
        Self(raw.to_le_bytes())
    }
}

impl fmt::Display for KeyTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match std::str::from_utf8(&self.0) {
            Ok(s) if s.chars().all(|c| c.is_ascii_graphic()) => f.write_str(s),
            _ => write!(f, "0x{:02x}{:02x}{:02x}{:02x}", self.0[0], self.0[1], self.0[2], self.0[3]),
        }
    }
}
