// Path: crates/api/src/state/backend.rs
//! Defines the `StateBackend` trait for the committed base store.

use crate::error::StateError;
use crate::state::{StateKey, StateScanIter, StateVal, StorageChanges, StoreId};

/// Read access to the committed base beneath every execution context's overlay.
///
/// The base is read-shared: contexts hold it behind an `Arc` and never write to
/// it directly. All methods take `&self`.
pub trait StateBackend: Send + Sync {
    /// Gets a committed value by key.
    fn get(&self, store: &StoreId, key: &[u8]) -> Result<Option<StateVal>, StateError>;

    /// Streams every committed entry with `start <= key < end` in ascending order.
    ///
    /// `end == None` leaves the range open above. Implementations must do work
    /// proportional to the entries in range, not to the size of the store.
    fn scan_range(
        &self,
        store: &StoreId,
        start: &[u8],
        end: Option<&[u8]>,
    ) -> Result<StateScanIter<'_>, StateError>;

    /// Lists the selectors of every non-empty child store.
    fn child_stores(&self) -> Result<Vec<Vec<u8>>, StateError>;

    /// The smallest committed key strictly greater than `key`.
    ///
    /// Backends with ordered indexes should override this with a direct seek.
    fn next_key(&self, store: &StoreId, key: &[u8]) -> Result<Option<StateKey>, StateError> {
        for item in self.scan_range(store, key, None)? {
            let (k, _) = item?;
            if &*k != key {
                return Ok(Some(k));
            }
        }
        Ok(None)
    }
}

/// A base store that can absorb a drained change set.
///
/// This is the single serialized commit point: the host calls it after an
/// execution context has finished, never from within a host call.
pub trait CommittableBackend: StateBackend {
    /// Atomically applies every insert and delete in `changes`.
    fn apply_changes(&self, changes: &StorageChanges) -> Result<(), StateError>;
}

impl<T: StateBackend + ?Sized> StateBackend for Box<T> {
    fn get(&self, store: &StoreId, key: &[u8]) -> Result<Option<StateVal>, StateError> {
        (**self).get(store, key)
    }

    fn scan_range(
        &self,
        store: &StoreId,
        start: &[u8],
        end: Option<&[u8]>,
    ) -> Result<StateScanIter<'_>, StateError> {
        (**self).scan_range(store, start, end)
    }

    fn child_stores(&self) -> Result<Vec<Vec<u8>>, StateError> {
        (**self).child_stores()
    }

    fn next_key(&self, store: &StoreId, key: &[u8]) -> Result<Option<StateKey>, StateError> {
        (**self).next_key(store, key)
    }
}

impl<T: StateBackend + ?Sized> StateBackend for std::sync::Arc<T> {
    fn get(&self, store: &StoreId, key: &[u8]) -> Result<Option<StateVal>, StateError> {
        (**self).get(store, key)
    }

    fn scan_range(
        &self,
        store: &StoreId,
        start: &[u8],
        end: Option<&[u8]>,
    ) -> Result<StateScanIter<'_>, StateError> {
        (**self).scan_range(store, start, end)
    }

    fn child_stores(&self) -> Result<Vec<Vec<u8>>, StateError> {
        (**self).child_stores()
    }

    fn next_key(&self, store: &StoreId, key: &[u8]) -> Result<Option<StateKey>, StateError> {
        (**self).next_key(store, key)
    }
}
