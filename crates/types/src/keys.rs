// Path: crates/types/src/keys.rs

/// Prefix under which the default store records the root of each child store.
pub const CHILD_STORAGE_KEY_PREFIX: &[u8] = b":child_storage:default:";

/// The key under which the root of the child store `child` is committed in the default store.
pub fn child_root_key(child: &[u8]) -> Vec<u8> {
    [CHILD_STORAGE_KEY_PREFIX, child].concat()
}
