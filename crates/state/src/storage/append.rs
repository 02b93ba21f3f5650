// Path: crates/state/src/storage/append.rs

//! The `storage.append` aggregate: a SCALE `Vec` whose items stay opaque.

use sbx_api::error::StateError;
use sbx_types::codec::{compact_len, split_compact_len};

/// Returns `current` with `item` appended, or a fresh one-item aggregate when absent.
///
/// Only the `Compact<u32>` count is decoded; the existing item bytes are copied
/// through untouched. An existing value that does not start with a valid count
/// (including an empty value) is rejected rather than reinitialized.
pub fn append_item(current: Option<&[u8]>, item: &[u8]) -> Result<Vec<u8>, StateError> {
    let Some(current) = current else {
        let mut out = compact_len(1);
        out.extend_from_slice(item);
        return Ok(out);
    };

    let (count, items) = split_compact_len(current).map_err(StateError::Decode)?;
    let count = count
        .checked_add(1)
        .ok_or_else(|| StateError::InvalidValue("append aggregate count overflows u32".into()))?;

    let mut out = compact_len(count);
    out.reserve(items.len() + item.len());
    out.extend_from_slice(items);
    out.extend_from_slice(item);
    Ok(out)
}
