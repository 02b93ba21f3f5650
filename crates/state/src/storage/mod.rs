// Path: crates/state/src/storage/mod.rs

//! The per-context storage façade.
//!
//! [`TransactionalStorage`] resolves every read through the frame arena and the
//! shared base, stages every write in the innermost frame, and owns the
//! transaction stack. It never writes to the base: the committed delta is handed
//! out by [`TransactionalStorage::drain_committed`].

use crate::overlay::{FrameArena, ResolvedIter, StagedValue};
use crate::trie::{self, RootHash};
use sbx_api::error::StateError;
use sbx_api::state::{
    next_prefix, ClearPrefixOutcome, StateBackend, StorageChanges, StoreId, VerifiableState,
};
use sbx_types::keys::{child_root_key, CHILD_STORAGE_KEY_PREFIX};
use sbx_types::state::StateVersion;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

mod append;

pub use append::append_item;

#[cfg(test)]
mod tests;

/// Transactional storage for one execution context.
pub struct TransactionalStorage {
    base: Arc<dyn StateBackend>,
    arena: FrameArena,
    max_depth: usize,
}

impl std::fmt::Debug for TransactionalStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionalStorage")
            .field("depth", &self.arena.depth())
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}

impl TransactionalStorage {
    /// Creates a storage view over `base` allowing at most `max_depth` nested transactions.
    pub fn new(base: Arc<dyn StateBackend>, max_depth: usize) -> Self {
        Self {
            base,
            arena: FrameArena::default(),
            max_depth,
        }
    }

    /// Number of open transactions.
    pub fn depth(&self) -> usize {
        self.arena.depth()
    }

    /// Resolves `key` through the open transactions, the committed delta and the base.
    pub fn get(&self, store: &StoreId, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        match self.arena.lookup(store, key) {
            Some(staged) => Ok(staged.value().cloned()),
            None => Ok(self.base.get(store, key)?.map(|v| v.to_vec())),
        }
    }

    pub fn exists(&self, store: &StoreId, key: &[u8]) -> Result<bool, StateError> {
        match self.arena.lookup(store, key) {
            Some(staged) => Ok(staged.value().is_some()),
            None => Ok(self.base.get(store, key)?.is_some()),
        }
    }

    /// The value of `key` from `offset` onward.
    ///
    /// An offset past the end yields an empty value, not an error.
    pub fn read(
        &self,
        store: &StoreId,
        key: &[u8],
        offset: u32,
    ) -> Result<Option<Vec<u8>>, StateError> {
        let offset = offset as usize;
        Ok(self
            .get(store, key)?
            .map(|value| value.get(offset..).map(<[u8]>::to_vec).unwrap_or_default()))
    }

    /// Stages `value` under `key`.
    ///
    /// Keys of the default store under `:child_storage:default:` belong to the
    /// child roots and are refused.
    pub fn set(&mut self, store: &StoreId, key: Vec<u8>, value: Vec<u8>) -> Result<(), StateError> {
        writable(store, &key)?;
        self.arena.stage(store, key, StagedValue::Set(value));
        Ok(())
    }

    pub fn clear(&mut self, store: &StoreId, key: Vec<u8>) -> Result<(), StateError> {
        writable(store, &key)?;
        self.arena.stage(store, key, StagedValue::Tombstone);
        Ok(())
    }

    /// Appends one encoded item to the aggregate stored under `key`.
    pub fn append(&mut self, store: &StoreId, key: Vec<u8>, item: &[u8]) -> Result<(), StateError> {
        let current = self.get(store, &key)?;
        let updated = append_item(current.as_deref(), item)?;
        self.set(store, key, updated)
    }

    /// The smallest resolved key strictly greater than `key`.
    ///
    /// Seeks the base and the frames separately; only keys deleted in a frame
    /// cost an extra step.
    pub fn next_key(&self, store: &StoreId, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        let mut after = key.to_vec();
        loop {
            let staged = self.arena.next_staged_key(store, &after).map(<[u8]>::to_vec);
            let committed = self.base.next_key(store, &after)?.map(|k| k.to_vec());
            let candidate = match (staged, committed) {
                (Some(a), Some(b)) => a.min(b),
                (Some(a), None) => a,
                (None, Some(b)) => b,
                (None, None) => return Ok(None),
            };
            if self.exists(store, &candidate)? {
                return Ok(Some(candidate));
            }
            after = candidate;
        }
    }

    /// Deletes up to `limit` keys starting with `prefix`, resuming at `cursor`.
    ///
    /// The returned cursor is the first matching key left in place; it is absent
    /// once no matching key remains. With a limit of zero nothing is deleted and
    /// the cursor reports whether any matching key exists.
    pub fn clear_prefix(
        &mut self,
        store: &StoreId,
        prefix: &[u8],
        limit: Option<u32>,
        cursor: Option<&[u8]>,
    ) -> Result<ClearPrefixOutcome, StateError> {
        if let Some(cursor) = cursor {
            if !cursor.starts_with(prefix) {
                return Err(StateError::InvalidCursor(format!(
                    "cursor {} is outside prefix {}",
                    hex::encode(cursor),
                    hex::encode(prefix)
                )));
            }
        }
        let start = cursor.unwrap_or(prefix);
        let end = next_prefix(prefix);
        let budget = limit.map_or(usize::MAX, |l| l as usize);

        let mut doomed = Vec::new();
        let mut next = None;
        for item in self.resolved(store, start, end.as_deref())? {
            let (key, _) = item?;
            if !key.starts_with(prefix) {
                break;
            }
            if doomed.len() >= budget {
                next = Some(key.to_vec());
                break;
            }
            doomed.push(key.to_vec());
        }

        let deleted = u32::try_from(doomed.len())
            .map_err(|_| StateError::InvalidValue("clear_prefix deleted more than u32::MAX keys".into()))?;
        for key in doomed {
            self.arena.stage(store, key, StagedValue::Tombstone);
        }
        tracing::debug!(
            target: "storage",
            prefix = %hex::encode(prefix),
            deleted,
            exhausted = next.is_none(),
            "cleared prefix"
        );
        Ok(ClearPrefixOutcome {
            deleted,
            cursor: next,
        })
    }

    /// Tombstones every key of the child store `child`.
    pub fn kill_child(&mut self, child: &[u8]) -> Result<u32, StateError> {
        let store = StoreId::Child(child.to_vec());
        Ok(self.clear_prefix(&store, &[], None, None)?.deleted)
    }

    pub fn begin_transaction(&mut self) -> Result<(), StateError> {
        if self.arena.depth() >= self.max_depth {
            return Err(StateError::TransactionDepthExceeded(self.max_depth));
        }
        self.arena.push();
        tracing::trace!(target: "storage", depth = self.arena.depth(), "transaction started");
        Ok(())
    }

    /// Merges the innermost transaction into its parent.
    pub fn commit_transaction(&mut self) -> Result<(), StateError> {
        if !self.arena.merge_top() {
            return Err(StateError::NoOpenTransaction);
        }
        tracing::trace!(target: "storage", depth = self.arena.depth(), "transaction committed");
        Ok(())
    }

    /// Discards the innermost transaction.
    pub fn rollback_transaction(&mut self) -> Result<(), StateError> {
        if !self.arena.discard_top() {
            return Err(StateError::NoOpenTransaction);
        }
        tracing::trace!(target: "storage", depth = self.arena.depth(), "transaction rolled back");
        Ok(())
    }

    /// Hands out the committed delta, leaving this context with an empty one.
    pub fn drain_committed(&mut self) -> Result<StorageChanges, StateError> {
        let open = self.arena.depth();
        self.arena
            .take_committed()
            .ok_or(StateError::TransactionsStillOpen(open))
    }

    /// Every resolved entry of `store`, in key order.
    pub fn entries(&self, store: &StoreId) -> Result<BTreeMap<Vec<u8>, Vec<u8>>, StateError> {
        self.resolved(store, &[], None)?
            .map(|item| item.map(|(k, v)| (k.to_vec(), v.to_vec())))
            .collect()
    }

    /// The root of `store` over its resolved view.
    ///
    /// The default store's root also commits to every non-empty child store,
    /// whose root is placed under its `:child_storage:default:` key. Those keys
    /// cannot be written directly, so nothing staged is shadowed here.
    pub fn root(&self, store: &StoreId, version: StateVersion) -> Result<RootHash, StateError> {
        let mut entries = self.entries(store)?;
        if *store == StoreId::Top {
            for child in self.child_stores()? {
                let child_entries = self.entries(&StoreId::Child(child.clone()))?;
                let key = child_root_key(&child);
                if child_entries.is_empty() {
                    entries.remove(&key);
                } else {
                    entries.insert(key, trie::trie_root(&child_entries, version)?.to_vec());
                }
            }
        }
        let root = trie::trie_root(&entries, version)?;
        tracing::debug!(
            target: "storage",
            store = ?store,
            root = %trie::root_hex(&root),
            "computed storage root"
        );
        Ok(root)
    }

    /// Selectors of every child store known to the base or touched by a frame.
    fn child_stores(&self) -> Result<BTreeSet<Vec<u8>>, StateError> {
        let mut children: BTreeSet<Vec<u8>> = self.base.child_stores()?.into_iter().collect();
        for frame in self.arena.layers() {
            for store in frame.stores() {
                if let StoreId::Child(child) = store {
                    children.insert(child.clone());
                }
            }
        }
        Ok(children)
    }

    /// The resolved view of `store` over `start..end`.
    fn resolved(
        &self,
        store: &StoreId,
        start: &[u8],
        end: Option<&[u8]>,
    ) -> Result<ResolvedIter<'_>, StateError> {
        let base = self.base.scan_range(store, start, end)?;
        Ok(ResolvedIter::new(base, self.arena.layers(), store, start, end))
    }
}

fn writable(store: &StoreId, key: &[u8]) -> Result<(), StateError> {
    if *store == StoreId::Top && key.starts_with(CHILD_STORAGE_KEY_PREFIX) {
        return Err(StateError::ReservedKey(hex::encode(key)));
    }
    Ok(())
}

impl VerifiableState for TransactionalStorage {
    type Commitment = RootHash;

    fn root_commitment(
        &self,
        store: &StoreId,
        version: StateVersion,
    ) -> Result<Self::Commitment, StateError> {
        self.root(store, version)
    }
}
