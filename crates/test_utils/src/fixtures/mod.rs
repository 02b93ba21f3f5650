//! Key/value fixtures for storage tests

use crate::randomness::TestRng;
use std::collections::BTreeMap;

/// A deterministic set of entries spread over a few shared prefixes.
///
/// Keys are `prefix ++ random suffix`, so prefix scans and clears have
/// something to bite on.
pub fn prefixed_entries(
    seed: u64,
    prefixes: &[&[u8]],
    count: usize,
) -> BTreeMap<Vec<u8>, Vec<u8>> {
    let mut rng = TestRng::new(seed);
    let mut out = BTreeMap::new();
    while out.len() < count {
        let Some(prefix) = rng.pick(prefixes) else {
            break;
        };
        let mut key = prefix.to_vec();
        key.extend(rng.bytes(6));
        let value = rng.bytes(48);
        out.insert(key, value);
    }
    out
}

/// The keys of `entries` that start with `prefix`.
pub fn keys_with_prefix(entries: &BTreeMap<Vec<u8>, Vec<u8>>, prefix: &[u8]) -> Vec<Vec<u8>> {
    entries
        .keys()
        .filter(|k| k.starts_with(prefix))
        .cloned()
        .collect()
}
