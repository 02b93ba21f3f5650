// Path: crates/state/src/backend/mod.rs
//! An in-memory committed base store.
//!
//! Shared between execution contexts behind an `Arc`. Reads take a read lock and
//! materialize the requested range; `apply_changes` is the one writer.

use sbx_api::error::StateError;
use sbx_api::state::{
    CommittableBackend, StateBackend, StateChangeSet, StateKVPair, StateKey, StateScanIter,
    StateVal, StorageChanges, StoreId,
};
use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Included, Unbounded};
use std::sync::{Arc, RwLock, RwLockReadGuard};

type Store = BTreeMap<Vec<u8>, Vec<u8>>;

/// A `BTreeMap`-backed store per [`StoreId`].
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    stores: RwLock<BTreeMap<StoreId, Store>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a backend whose default store holds `entries`.
    pub fn with_top<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Vec<u8>, Vec<u8>)>,
    {
        let top: Store = entries.into_iter().collect();
        let mut stores = BTreeMap::new();
        if !top.is_empty() {
            stores.insert(StoreId::Top, top);
        }
        Self {
            stores: RwLock::new(stores),
        }
    }

    /// Convenience constructor for sharing.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<StoreId, Store>>, StateError> {
        self.stores
            .read()
            .map_err(|_| StateError::Backend("base store lock poisoned".into()))
    }
}

fn apply_set(store: &mut Store, changes: &StateChangeSet) {
    let (inserts, deletes) = changes;
    for key in deletes {
        store.remove(key);
    }
    for (key, value) in inserts {
        store.insert(key.clone(), value.clone());
    }
}

impl StateBackend for InMemoryBackend {
    fn get(&self, store: &StoreId, key: &[u8]) -> Result<Option<StateVal>, StateError> {
        let stores = self.read()?;
        Ok(stores
            .get(store)
            .and_then(|s| s.get(key))
            .map(|v| Arc::from(v.as_slice())))
    }

    fn scan_range(
        &self,
        store: &StoreId,
        start: &[u8],
        end: Option<&[u8]>,
    ) -> Result<StateScanIter<'_>, StateError> {
        let stores = self.read()?;
        let items: Vec<Result<StateKVPair, StateError>> = match (stores.get(store), end) {
            // An empty range; `BTreeMap::range` rejects inverted bounds.
            (_, Some(end)) if end <= start => Vec::new(),
            (Some(s), end) => {
                let upper = end.map_or(Unbounded, Excluded);
                s.range::<[u8], _>((Included(start), upper))
                    .map(|(k, v)| Ok((Arc::from(k.as_slice()), Arc::from(v.as_slice()))))
                    .collect()
            }
            (None, _) => Vec::new(),
        };
        Ok(Box::new(items.into_iter()))
    }

    fn next_key(&self, store: &StoreId, key: &[u8]) -> Result<Option<StateKey>, StateError> {
        let stores = self.read()?;
        Ok(stores.get(store).and_then(|s| {
            s.range::<[u8], _>((Excluded(key), Unbounded))
                .next()
                .map(|(k, _)| Arc::from(k.as_slice()))
        }))
    }

    fn child_stores(&self) -> Result<Vec<Vec<u8>>, StateError> {
        let stores = self.read()?;
        Ok(stores
            .iter()
            .filter_map(|(id, s)| match id {
                StoreId::Child(child) if !s.is_empty() => Some(child.clone()),
                _ => None,
            })
            .collect())
    }
}

impl CommittableBackend for InMemoryBackend {
    fn apply_changes(&self, changes: &StorageChanges) -> Result<(), StateError> {
        let mut stores = self
            .stores
            .write()
            .map_err(|_| StateError::Backend("base store lock poisoned".into()))?;
        apply_set(stores.entry(StoreId::Top).or_default(), &changes.top);
        for (child, set) in &changes.children {
            apply_set(stores.entry(StoreId::Child(child.clone())).or_default(), set);
        }
        stores.retain(|_, s| !s.is_empty());
        tracing::debug!(
            target: "storage",
            inserts = changes.top.0.len(),
            deletes = changes.top.1.len(),
            children = changes.children.len(),
            "applied committed change set to base"
        );
        Ok(())
    }
}
