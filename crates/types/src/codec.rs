// crates/types/src/codec.rs

//! The canonical, deterministic binary codec used on both sides of the boundary.
//!
//! Thin wrappers around `parity-scale-codec` (SCALE). Everything the host writes
//! into guest memory as a structured value (optional buffers, clear-prefix results,
//! version descriptors) and every aggregate maintained by `storage.append` goes
//! through these helpers, so producer and consumer agree byte for byte.

use parity_scale_codec::{Compact, Decode, DecodeAll, Encode};

/// Encodes a value into its canonical SCALE byte representation.
pub fn to_bytes_canonical<T: Encode>(v: &T) -> Vec<u8> {
    v.encode()
}

/// Decodes a value from its canonical SCALE byte representation.
///
/// Trailing bytes are rejected.
pub fn from_bytes_canonical<T: Decode>(b: &[u8]) -> Result<T, String> {
    T::decode_all(&mut &*b).map_err(|e| format!("canonical decode failed: {}", e))
}

/// Splits a SCALE sequence into its element count and the remaining item bytes.
///
/// The items themselves are opaque: only the `Compact<u32>` length prefix is parsed.
pub fn split_compact_len(b: &[u8]) -> Result<(u32, &[u8]), String> {
    let mut input = b;
    let Compact(len) = <Compact<u32>>::decode(&mut input)
        .map_err(|e| format!("aggregate length prefix decode failed: {}", e))?;
    Ok((len, input))
}

/// Encodes a `Compact<u32>` length prefix.
pub fn compact_len(len: u32) -> Vec<u8> {
    Compact(len).encode()
}
