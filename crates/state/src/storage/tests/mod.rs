// Path: crates/state/src/storage/tests/mod.rs

use super::*;
use crate::backend::InMemoryBackend;
use parity_scale_codec::Encode;
use sbx_api::state::{CommittableBackend, StateKey, StateScanIter, StateVal};
use sbx_test_utils::assert_ok;
use std::sync::atomic::{AtomicUsize, Ordering};

const TOP: StoreId = StoreId::Top;

fn storage_over(entries: &[(&str, &str)]) -> TransactionalStorage {
    let base = InMemoryBackend::with_top(
        entries
            .iter()
            .map(|(k, v)| (k.as_bytes().to_vec(), v.as_bytes().to_vec())),
    );
    TransactionalStorage::new(Arc::new(base), 16)
}

fn get(s: &TransactionalStorage, key: &str) -> Option<Vec<u8>> {
    s.get(&TOP, key.as_bytes()).unwrap()
}

/// Counts every entry the base hands out through a range scan.
struct CountingBackend {
    inner: InMemoryBackend,
    scanned: AtomicUsize,
}

impl CountingBackend {
    fn new(inner: InMemoryBackend) -> Self {
        Self {
            inner,
            scanned: AtomicUsize::new(0),
        }
    }

    fn scanned(&self) -> usize {
        self.scanned.load(Ordering::Relaxed)
    }
}

impl StateBackend for CountingBackend {
    fn get(&self, store: &StoreId, key: &[u8]) -> Result<Option<StateVal>, StateError> {
        self.inner.get(store, key)
    }

    fn scan_range(
        &self,
        store: &StoreId,
        start: &[u8],
        end: Option<&[u8]>,
    ) -> Result<StateScanIter<'_>, StateError> {
        let iter = self.inner.scan_range(store, start, end)?;
        Ok(Box::new(iter.inspect(move |_| {
            self.scanned.fetch_add(1, Ordering::Relaxed);
        })))
    }

    fn child_stores(&self) -> Result<Vec<Vec<u8>>, StateError> {
        self.inner.child_stores()
    }

    fn next_key(&self, store: &StoreId, key: &[u8]) -> Result<Option<StateKey>, StateError> {
        self.inner.next_key(store, key)
    }
}

fn set(s: &mut TransactionalStorage, key: &str, value: &str) {
    s.set(&TOP, key.as_bytes().to_vec(), value.as_bytes().to_vec()).unwrap();
}

#[test]
fn nested_rollback_then_commit_keeps_outer_write() {
    let mut s = storage_over(&[]);
    s.begin_transaction().unwrap();
    set(&mut s, "a", "1");
    s.begin_transaction().unwrap();
    set(&mut s, "a", "2");
    s.rollback_transaction().unwrap();
    s.commit_transaction().unwrap();

    assert_eq!(get(&s, "a"), Some(b"1".to_vec()));
    assert_eq!(s.depth(), 0);
}

#[test]
fn rollback_restores_every_pre_begin_value() {
    let mut s = storage_over(&[("a", "base"), ("b", "base")]);
    set(&mut s, "c", "committed");

    s.begin_transaction().unwrap();
    set(&mut s, "a", "changed");
    s.clear(&TOP, b"b".to_vec()).unwrap();
    s.clear(&TOP, b"c".to_vec()).unwrap();
    set(&mut s, "d", "new");
    s.rollback_transaction().unwrap();

    assert_eq!(get(&s, "a"), Some(b"base".to_vec()));
    assert_eq!(get(&s, "b"), Some(b"base".to_vec()));
    assert_eq!(get(&s, "c"), Some(b"committed".to_vec()));
    assert_eq!(get(&s, "d"), None);
}

#[test]
fn commit_applies_written_keys_and_leaves_others() {
    let mut s = storage_over(&[("a", "1"), ("b", "1"), ("c", "1")]);
    s.begin_transaction().unwrap();
    set(&mut s, "b", "2");
    s.clear(&TOP, b"c".to_vec()).unwrap();
    s.commit_transaction().unwrap();

    assert_eq!(get(&s, "a"), Some(b"1".to_vec()));
    assert_eq!(get(&s, "b"), Some(b"2".to_vec()));
    assert_eq!(get(&s, "c"), None);
}

#[test]
fn transaction_misuse_is_reported() {
    let mut s = storage_over(&[]);
    assert_eq!(s.commit_transaction(), Err(StateError::NoOpenTransaction));
    assert_eq!(s.rollback_transaction(), Err(StateError::NoOpenTransaction));

    let mut shallow = TransactionalStorage::new(Arc::new(InMemoryBackend::new()), 1);
    assert_ok!(shallow.begin_transaction());
    assert_eq!(
        shallow.begin_transaction(),
        Err(StateError::TransactionDepthExceeded(1))
    );
    assert_eq!(
        shallow.drain_committed(),
        Err(StateError::TransactionsStillOpen(1))
    );
}

#[test]
fn empty_value_is_present_and_read_clamps_offset() {
    let mut s = storage_over(&[("k", "hello")]);
    set(&mut s, "empty", "");

    assert!(s.exists(&TOP, b"empty").unwrap());
    assert_eq!(get(&s, "empty"), Some(Vec::new()));
    assert!(!s.exists(&TOP, b"missing").unwrap());

    assert_eq!(s.read(&TOP, b"k", 2).unwrap(), Some(b"llo".to_vec()));
    assert_eq!(s.read(&TOP, b"k", 5).unwrap(), Some(Vec::new()));
    assert_eq!(s.read(&TOP, b"k", 99).unwrap(), Some(Vec::new()));
    assert_eq!(s.read(&TOP, b"missing", 0).unwrap(), None);
}

#[test]
fn next_key_skips_tombstones_and_sees_staged_keys() {
    let mut s = storage_over(&[("a", "1"), ("b", "1"), ("d", "1")]);
    s.begin_transaction().unwrap();
    s.clear(&TOP, b"b".to_vec()).unwrap();
    set(&mut s, "c", "staged");

    assert_eq!(s.next_key(&TOP, b"a").unwrap(), Some(b"c".to_vec()));
    assert_eq!(s.next_key(&TOP, b"c").unwrap(), Some(b"d".to_vec()));
    assert_eq!(s.next_key(&TOP, b"").unwrap(), Some(b"a".to_vec()));
    assert_eq!(s.next_key(&TOP, b"d").unwrap(), None);
}

#[test]
fn append_builds_a_scale_vec_and_rejects_foreign_values() {
    let mut s = storage_over(&[("foreign", "")]);
    s.append(&TOP, b"events".to_vec(), &1u32.encode()).unwrap();
    s.begin_transaction().unwrap();
    s.append(&TOP, b"events".to_vec(), &2u32.encode()).unwrap();
    s.commit_transaction().unwrap();

    assert_eq!(get(&s, "events"), Some(vec![1u32, 2].encode()));
    assert!(matches!(
        s.append(&TOP, b"foreign".to_vec(), &3u32.encode()),
        Err(StateError::Decode(_))
    ));
    // A failed append leaves the value untouched.
    assert_eq!(get(&s, "foreign"), Some(Vec::new()));
}

#[test]
fn clear_prefix_with_limit_and_cursor() {
    let mut s = storage_over(&[
        ("p1", "x"),
        ("p2", "x"),
        ("p3", "x"),
        ("p4", "x"),
        ("q1", "x"),
    ]);
    set(&mut s, "p5", "staged");

    let first = s.clear_prefix(&TOP, b"p", Some(2), None).unwrap();
    assert_eq!(first.deleted, 2);
    assert_eq!(first.cursor.as_deref(), Some(&b"p3"[..]));

    let second = s
        .clear_prefix(&TOP, b"p", Some(2), first.cursor.as_deref())
        .unwrap();
    assert_eq!(second.deleted, 2);
    assert_eq!(second.cursor.as_deref(), Some(&b"p5"[..]));

    let last = s
        .clear_prefix(&TOP, b"p", None, second.cursor.as_deref())
        .unwrap();
    assert_eq!(last.deleted, 1);
    assert_eq!(last.cursor, None);

    for k in ["p1", "p2", "p3", "p4", "p5"] {
        assert_eq!(get(&s, k), None, "{k} should be cleared");
    }
    assert_eq!(get(&s, "q1"), Some(b"x".to_vec()));
}

#[test]
fn zero_limit_only_reports_presence() {
    let mut s = storage_over(&[("p1", "x")]);
    let presence = s.clear_prefix(&TOP, b"p", Some(0), None).unwrap();
    assert_eq!(presence.deleted, 0);
    assert_eq!(presence.cursor.as_deref(), Some(&b"p1"[..]));
    assert_eq!(get(&s, "p1"), Some(b"x".to_vec()));

    let none = s.clear_prefix(&TOP, b"z", Some(0), None).unwrap();
    assert_eq!(none.cursor, None);
}

#[test]
fn cursor_outside_prefix_is_rejected() {
    let mut s = storage_over(&[("p1", "x")]);
    assert!(matches!(
        s.clear_prefix(&TOP, b"p", None, Some(&b"q1"[..])),
        Err(StateError::InvalidCursor(_))
    ));
    assert_eq!(get(&s, "p1"), Some(b"x".to_vec()));
}

#[test]
fn cleared_prefix_rolls_back_with_its_transaction() {
    let mut s = storage_over(&[("p1", "x"), ("p2", "x")]);
    s.begin_transaction().unwrap();
    let outcome = s.clear_prefix(&TOP, b"p", None, None).unwrap();
    assert_eq!(outcome.deleted, 2);
    assert_eq!(get(&s, "p1"), None);
    s.rollback_transaction().unwrap();
    assert_eq!(get(&s, "p1"), Some(b"x".to_vec()));
    assert_eq!(get(&s, "p2"), Some(b"x".to_vec()));
}

#[test]
fn root_ignores_write_order_and_nesting() {
    let mut flat = storage_over(&[("a", "1")]);
    set(&mut flat, "b", "2");
    set(&mut flat, "c", "3");

    let mut nested = storage_over(&[("a", "1"), ("c", "old")]);
    nested.begin_transaction().unwrap();
    set(&mut nested, "c", "3");
    nested.begin_transaction().unwrap();
    set(&mut nested, "b", "2");
    set(&mut nested, "tmp", "gone");
    nested.clear(&TOP, b"tmp".to_vec()).unwrap();
    nested.commit_transaction().unwrap();

    assert_eq!(
        flat.root(&TOP, StateVersion::V0).unwrap(),
        nested.root(&TOP, StateVersion::V0).unwrap()
    );
    assert_eq!(
        flat.root_commitment(&TOP, StateVersion::V1).unwrap(),
        nested.root_commitment(&TOP, StateVersion::V1).unwrap()
    );
}

#[test]
fn top_root_commits_to_child_stores() {
    let child = StoreId::Child(b"kid".to_vec());
    let mut s = storage_over(&[("a", "1")]);
    let without_child = s.root(&TOP, StateVersion::V0).unwrap();

    s.set(&child, b"k".to_vec(), b"v".to_vec()).unwrap();
    let with_child = s.root(&TOP, StateVersion::V0).unwrap();
    assert_ne!(without_child, with_child);
    assert_ne!(
        s.root(&child, StateVersion::V0).unwrap(),
        trie::empty_root().unwrap()
    );

    assert_eq!(s.kill_child(b"kid").unwrap(), 1);
    assert_eq!(s.root(&TOP, StateVersion::V0).unwrap(), without_child);
    assert_eq!(s.root(&child, StateVersion::V0).unwrap(), trie::empty_root().unwrap());
}

#[test]
fn drained_changes_reach_the_base() {
    let base = Arc::new(InMemoryBackend::with_top(vec![(b"old".to_vec(), b"1".to_vec())]));
    let mut s = TransactionalStorage::new(base.clone(), 8);
    s.set(&TOP, b"new".to_vec(), b"2".to_vec()).unwrap();
    s.clear(&TOP, b"old".to_vec()).unwrap();
    s.set(&StoreId::Child(b"kid".to_vec()), b"k".to_vec(), b"v".to_vec()).unwrap();
    let root_before = s.root(&TOP, StateVersion::V0).unwrap();

    let changes = s.drain_committed().unwrap();
    assert_eq!(changes.top.0, vec![(b"new".to_vec(), b"2".to_vec())]);
    assert_eq!(changes.top.1, vec![b"old".to_vec()]);
    assert_ok!(base.apply_changes(&changes));

    let fresh = TransactionalStorage::new(base, 8);
    assert_eq!(fresh.root(&TOP, StateVersion::V0).unwrap(), root_before);
    assert_eq!(fresh.get(&TOP, b"old").unwrap(), None);
    assert!(s.drain_committed().unwrap().is_empty());
}

#[test]
fn prefix_work_does_not_grow_with_the_rest_of_the_store() {
    let mut entries: Vec<(Vec<u8>, Vec<u8>)> =
        (0..10u8).map(|i| (vec![b'a', i], b"x".to_vec())).collect();
    entries.extend(
        (0..5_000u32).map(|i| ([&b"b"[..], &i.to_be_bytes()[..]].concat(), b"x".to_vec())),
    );
    let base = Arc::new(CountingBackend::new(InMemoryBackend::with_top(entries)));
    let mut s = TransactionalStorage::new(base.clone(), 8);

    let mut cursor: Option<Vec<u8>> = None;
    for _ in 0..10 {
        let outcome = s.clear_prefix(&TOP, b"a", Some(1), cursor.as_deref()).unwrap();
        assert_eq!(outcome.deleted, 1);
        cursor = outcome.cursor;
    }
    assert_eq!(cursor, None);
    // Each call reads at most the ten matching base entries.
    assert!(base.scanned() <= 100, "scanned {} entries", base.scanned());

    let scanned = base.scanned();
    let first_b = [&b"b"[..], &0u32.to_be_bytes()[..]].concat();
    assert_eq!(s.next_key(&TOP, b"a").unwrap(), Some(first_b.clone()));
    assert_eq!(
        s.next_key(&TOP, &first_b).unwrap(),
        Some([&b"b"[..], &1u32.to_be_bytes()[..]].concat())
    );
    assert_eq!(base.scanned(), scanned, "next_key must seek, not scan");
}

#[test]
fn cursor_survives_commits_from_another_context() {
    let base = Arc::new(InMemoryBackend::with_top(
        ["p1", "p2", "p3", "p4", "p5", "p6", "q1"]
            .iter()
            .map(|k| (k.as_bytes().to_vec(), b"x".to_vec())),
    ));
    let mut first = TransactionalStorage::new(base.clone(), 8);
    let started = first.clear_prefix(&TOP, b"p", Some(2), None).unwrap();
    assert_eq!(started.deleted, 2);
    assert_eq!(started.cursor.as_deref(), Some(&b"p3"[..]));

    // Another context rewrites keys around the cursor, the cursor key included.
    let mut other = TransactionalStorage::new(base.clone(), 8);
    set(&mut other, "p25", "late");
    set(&mut other, "p35", "late");
    set(&mut other, "q0", "late");
    other.clear(&TOP, b"p3".to_vec()).unwrap();
    other.clear(&TOP, b"p5".to_vec()).unwrap();
    assert_ok!(base.apply_changes(&other.drain_committed().unwrap()));

    let resumed = first
        .clear_prefix(&TOP, b"p", None, started.cursor.as_deref())
        .unwrap();
    assert_eq!(resumed.deleted, 3);
    assert_eq!(resumed.cursor, None);

    for k in ["p1", "p2", "p3", "p4", "p5", "p6", "p35"] {
        assert_eq!(get(&first, k), None, "{k} should be gone");
    }
    // Resumption starts at the cursor, so a key inserted before it stays.
    assert_eq!(get(&first, "p25"), Some(b"late".to_vec()));
    assert_eq!(get(&first, "q0"), Some(b"late".to_vec()));
    assert_eq!(get(&first, "q1"), Some(b"x".to_vec()));

    // Every tombstone was written once and only under the prefix.
    let changes = first.drain_committed().unwrap();
    assert!(changes.top.0.is_empty());
    let deleted: Vec<&[u8]> = changes.top.1.iter().map(Vec::as_slice).collect();
    assert_eq!(deleted, vec![&b"p1"[..], &b"p2"[..], &b"p35"[..], &b"p4"[..], &b"p6"[..]]);
}

#[test]
fn child_root_keys_cannot_be_written_in_the_default_store() {
    let mut s = storage_over(&[]);
    let reserved = child_root_key(b"kid");
    assert!(matches!(
        s.set(&TOP, reserved.clone(), b"forged".to_vec()),
        Err(StateError::ReservedKey(_))
    ));
    assert!(matches!(
        s.clear(&TOP, reserved.clone()),
        Err(StateError::ReservedKey(_))
    ));
    assert!(matches!(
        s.append(&TOP, reserved.clone(), &[1]),
        Err(StateError::ReservedKey(_))
    ));
    assert_eq!(s.get(&TOP, &reserved).unwrap(), None);

    // Inside a child store the same bytes are an ordinary key.
    let child = StoreId::Child(b"other".to_vec());
    assert_ok!(s.set(&child, reserved.clone(), b"v".to_vec()));
    assert_eq!(s.get(&child, &reserved).unwrap(), Some(b"v".to_vec()));
}
