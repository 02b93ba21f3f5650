// Path: crates/api/src/state/mod.rs
//! Core traits for state management.
//!
//! - `StateBackend`: read access to the committed base, shared across contexts.
//! - `CommittableBackend`: the serialized commit point applying a drained change set.
//! - `VerifiableState`: anything that can produce a root commitment over a store.

use crate::error::StateError;
use parity_scale_codec::{Decode, Encode};
use std::collections::BTreeMap;
use std::sync::Arc;

// --- Type Aliases for common state patterns ---
/// An atomically reference-counted, owned key slice.
pub type StateKey = Arc<[u8]>;
/// An atomically reference-counted, owned value slice.
pub type StateVal = Arc<[u8]>;
/// An owned key-value pair from the state, using cheap-to-clone Arcs.
pub type StateKVPair = (StateKey, StateVal);
/// A streaming iterator over key-value pairs in ascending key order.
pub type StateScanIter<'a> = Box<dyn Iterator<Item = Result<StateKVPair, StateError>> + Send + 'a>;

/// A vector of key-value pairs to be inserted or updated.
pub type StateInserts = Vec<(Vec<u8>, Vec<u8>)>;
/// A vector of keys to be deleted.
pub type StateDeletes = Vec<Vec<u8>>;
/// A tuple representing a full set of state changes (inserts/updates and deletes).
pub type StateChangeSet = (StateInserts, StateDeletes);

mod backend;
mod commitment;

pub use backend::*;
pub use commitment::*;

/// Addresses one independently rooted store: the default store or a child store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum StoreId {
    /// The default (top) store.
    #[default]
    Top,
    /// The child store selected by this key.
    Child(Vec<u8>),
}

/// The exclusive upper bound of the keys starting with `prefix`.
///
/// `None` when no such bound exists: the prefix is empty or all `0xff`.
pub fn next_prefix(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut end = prefix.to_vec();
    while let Some(last) = end.pop() {
        if last < u8::MAX {
            end.push(last + 1);
            return Some(end);
        }
    }
    None
}

/// The committed delta of one execution context, ordered by key within each store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageChanges {
    /// Changes to the default store.
    pub top: StateChangeSet,
    /// Changes to each touched child store.
    pub children: BTreeMap<Vec<u8>, StateChangeSet>,
}

impl StorageChanges {
    /// True when no store was touched.
    pub fn is_empty(&self) -> bool {
        self.top.0.is_empty() && self.top.1.is_empty() && self.children.is_empty()
    }
}

/// The packed result of `storage.clear_prefix`.
#[derive(Encode, Decode, Debug, Clone, PartialEq, Eq)]
pub struct ClearPrefixOutcome {
    /// Number of keys deleted by this call.
    pub deleted: u32,
    /// The key to resume from, present while matching keys remain.
    pub cursor: Option<Vec<u8>>,
}
