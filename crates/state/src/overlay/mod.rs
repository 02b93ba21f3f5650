// Path: crates/state/src/overlay/mod.rs

//! Staged-write frames and the arena that stacks them.
//!
//! Frame 0 holds the context's committed delta over the shared base and is never
//! popped. Every open transaction adds one frame whose `parent` is the frame
//! below it. Lookups walk from the top frame down the parent chain and fall
//! through to the base; rollback truncates the arena.

use sbx_api::state::{StateChangeSet, StorageChanges, StoreId};
use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Unbounded};

mod resolved;

pub use resolved::ResolvedIter;

/// A write recorded in a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StagedValue {
    /// The key maps to this value.
    Set(Vec<u8>),
    /// The key is deleted, shadowing any value below.
    Tombstone,
}

impl StagedValue {
    /// The value, or `None` for a tombstone.
    pub fn value(&self) -> Option<&Vec<u8>> {
        match self {
            StagedValue::Set(v) => Some(v),
            StagedValue::Tombstone => None,
        }
    }
}

/// Writes staged against one store, ordered by key.
pub type StagedWrites = BTreeMap<Vec<u8>, StagedValue>;

/// One layer of staged writes over its parent.
#[derive(Debug, Default, Clone)]
pub struct Frame {
    parent: Option<usize>,
    writes: BTreeMap<StoreId, StagedWrites>,
}

impl Frame {
    /// The staged entry for `key`, if this frame touched it.
    pub fn lookup(&self, store: &StoreId, key: &[u8]) -> Option<&StagedValue> {
        self.writes.get(store).and_then(|w| w.get(key))
    }

    /// The staged writes for `store`, if any.
    pub fn store(&self, store: &StoreId) -> Option<&StagedWrites> {
        self.writes.get(store)
    }

    /// Every store this frame touched.
    pub fn stores(&self) -> impl Iterator<Item = &StoreId> {
        self.writes.keys()
    }

    fn stage(&mut self, store: &StoreId, key: Vec<u8>, value: StagedValue) {
        self.writes.entry(store.clone()).or_default().insert(key, value);
    }

    /// Folds `upper` into this frame, last writer wins.
    fn absorb(&mut self, upper: Frame) {
        for (store, writes) in upper.writes {
            self.writes.entry(store).or_default().extend(writes);
        }
    }

    fn into_changes(self) -> StorageChanges {
        let mut changes = StorageChanges::default();
        for (store, writes) in self.writes {
            let set = ordered_batch(writes);
            match store {
                StoreId::Top => changes.top = set,
                StoreId::Child(child) => {
                    changes.children.insert(child, set);
                }
            }
        }
        changes
    }
}

/// Splits staged writes into sorted inserts and deletes.
fn ordered_batch(writes: StagedWrites) -> StateChangeSet {
    let mut inserts = Vec::new();
    let mut deletes = Vec::new();
    for (key, staged) in writes {
        match staged {
            StagedValue::Set(value) => inserts.push((key, value)),
            StagedValue::Tombstone => deletes.push(key),
        }
    }
    (inserts, deletes)
}

/// The arena of frames: index 0 is the committed delta, the rest are open transactions.
#[derive(Debug, Clone)]
pub struct FrameArena {
    frames: Vec<Frame>,
}

impl Default for FrameArena {
    fn default() -> Self {
        Self {
            frames: vec![Frame::default()],
        }
    }
}

impl FrameArena {
    /// Number of open transactions.
    pub fn depth(&self) -> usize {
        self.frames.len().saturating_sub(1)
    }

    fn top_index(&self) -> usize {
        self.depth()
    }

    /// Resolves `key` through the frame chain; `None` means no frame touched it.
    pub fn lookup(&self, store: &StoreId, key: &[u8]) -> Option<&StagedValue> {
        let mut cursor = Some(self.top_index());
        while let Some(index) = cursor {
            let frame = self.frames.get(index)?;
            if let Some(staged) = frame.lookup(store, key) {
                return Some(staged);
            }
            cursor = frame.parent;
        }
        None
    }

    /// The smallest key strictly greater than `key` that any frame touched,
    /// tombstones included.
    pub fn next_staged_key(&self, store: &StoreId, key: &[u8]) -> Option<&[u8]> {
        self.frames
            .iter()
            .filter_map(|frame| frame.store(store))
            .filter_map(|writes| {
                writes
                    .range::<[u8], _>((Excluded(key), Unbounded))
                    .next()
                    .map(|(k, _)| k.as_slice())
            })
            .min()
    }

    /// Frames from the committed delta (lowest precedence) to the innermost transaction.
    pub fn layers(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter()
    }

    /// Stages a write in the innermost frame.
    pub fn stage(&mut self, store: &StoreId, key: Vec<u8>, value: StagedValue) {
        let top = self.top_index();
        if let Some(frame) = self.frames.get_mut(top) {
            frame.stage(store, key, value);
        }
    }

    /// Pushes an empty frame on top.
    pub fn push(&mut self) {
        let parent = Some(self.top_index());
        self.frames.push(Frame {
            parent,
            writes: BTreeMap::new(),
        });
    }

    /// Merges the top frame into its parent. `false` if no transaction is open.
    pub fn merge_top(&mut self) -> bool {
        if self.depth() == 0 {
            return false;
        }
        let Some(top) = self.frames.pop() else {
            return false;
        };
        let parent = top.parent.unwrap_or(0);
        match self.frames.get_mut(parent) {
            Some(frame) => {
                frame.absorb(top);
                true
            }
            None => false,
        }
    }

    /// Drops the top frame. `false` if no transaction is open.
    pub fn discard_top(&mut self) -> bool {
        if self.depth() == 0 {
            return false;
        }
        self.frames.pop().is_some()
    }

    /// Takes the committed delta, leaving an empty one. Only valid at depth 0.
    pub fn take_committed(&mut self) -> Option<StorageChanges> {
        if self.depth() != 0 {
            return None;
        }
        let committed = std::mem::take(self.frames.get_mut(0)?);
        Some(committed.into_changes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(v: &[u8]) -> StagedValue {
        StagedValue::Set(v.to_vec())
    }

    #[test]
    fn lookup_walks_parent_chain_and_tombstones_shadow() {
        let top = StoreId::Top;
        let mut arena = FrameArena::default();
        arena.stage(&top, b"a".to_vec(), set(b"0"));
        arena.push();
        arena.stage(&top, b"a".to_vec(), StagedValue::Tombstone);
        arena.push();
        arena.stage(&top, b"b".to_vec(), set(b"2"));

        assert_eq!(arena.depth(), 2);
        assert_eq!(arena.lookup(&top, b"a"), Some(&StagedValue::Tombstone));
        assert_eq!(arena.lookup(&top, b"b"), Some(&set(b"2")));
        assert_eq!(arena.lookup(&top, b"c"), None);

        assert!(arena.discard_top());
        assert!(arena.discard_top());
        assert!(!arena.discard_top());
        assert_eq!(arena.lookup(&top, b"a"), Some(&set(b"0")));
    }

    #[test]
    fn merge_top_is_last_writer_wins() {
        let top = StoreId::Top;
        let mut arena = FrameArena::default();
        arena.stage(&top, b"k".to_vec(), set(b"base"));
        arena.push();
        arena.stage(&top, b"k".to_vec(), set(b"txn"));
        arena.stage(&top, b"gone".to_vec(), StagedValue::Tombstone);
        assert!(arena.merge_top());
        assert!(!arena.merge_top());

        let changes = arena.take_committed().unwrap();
        assert_eq!(changes.top.0, vec![(b"k".to_vec(), b"txn".to_vec())]);
        assert_eq!(changes.top.1, vec![b"gone".to_vec()]);
        assert!(arena.take_committed().unwrap().is_empty());
    }

    #[test]
    fn next_staged_key_sees_every_frame() {
        let top = StoreId::Top;
        let mut arena = FrameArena::default();
        arena.stage(&top, b"c".to_vec(), set(b"0"));
        arena.push();
        arena.stage(&top, b"b".to_vec(), StagedValue::Tombstone);

        assert_eq!(arena.next_staged_key(&top, b"a"), Some(&b"b"[..]));
        assert_eq!(arena.next_staged_key(&top, b"b"), Some(&b"c"[..]));
        assert_eq!(arena.next_staged_key(&top, b"c"), None);
        assert_eq!(arena.next_staged_key(&StoreId::Child(b"x".to_vec()), b""), None);
    }

    #[test]
    fn take_committed_refuses_while_open() {
        let mut arena = FrameArena::default();
        arena.push();
        assert!(arena.take_committed().is_none());
    }
}
