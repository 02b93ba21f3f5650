// Path: crates/state/tests/properties.rs

//! Property tests over the transactional storage and its trie commitment.

use proptest::prelude::*;
use sbx_api::state::StoreId;
use sbx_state::prelude::*;
use sbx_state::trie::empty_root;
use sbx_test_utils::fixtures::{keys_with_prefix, prefixed_entries};
use sbx_types::state::StateVersion;
use std::collections::BTreeMap;
use std::sync::Arc;

const TOP: StoreId = StoreId::Top;

/// A write: `Some` sets the value, `None` clears the key.
type Op = (Vec<u8>, Option<Vec<u8>>);

fn small_key() -> impl Strategy<Value = Vec<u8>> {
    // A tiny alphabet so keys collide and share prefixes.
    prop::collection::vec(0u8..4, 0..4)
}

fn op() -> impl Strategy<Value = Op> {
    (
        small_key(),
        prop::option::of(prop::collection::vec(any::<u8>(), 0..48)),
    )
}

fn base_entries() -> impl Strategy<Value = BTreeMap<Vec<u8>, Vec<u8>>> {
    prop::collection::btree_map(small_key(), prop::collection::vec(any::<u8>(), 0..8), 0..12)
}

fn storage_over(entries: &BTreeMap<Vec<u8>, Vec<u8>>) -> TransactionalStorage {
    let base = InMemoryBackend::with_top(entries.clone());
    TransactionalStorage::new(Arc::new(base), 64)
}

fn apply(storage: &mut TransactionalStorage, ops: &[Op]) {
    for (key, value) in ops {
        match value {
            Some(v) => storage.set(&TOP, key.clone(), v.clone()).unwrap(),
            None => storage.clear(&TOP, key.clone()).unwrap(),
        }
    }
}

proptest! {
    #[test]
    fn rollback_restores_visible_state(
        entries in base_entries(),
        committed in prop::collection::vec(op(), 0..8),
        doomed in prop::collection::vec(op(), 0..16),
    ) {
        let mut storage = storage_over(&entries);
        apply(&mut storage, &committed);
        let before = storage.entries(&TOP).unwrap();

        storage.begin_transaction().unwrap();
        apply(&mut storage, &doomed[..doomed.len() / 2]);
        storage.begin_transaction().unwrap();
        apply(&mut storage, &doomed[doomed.len() / 2..]);
        storage.commit_transaction().unwrap();
        storage.rollback_transaction().unwrap();

        prop_assert_eq!(storage.entries(&TOP).unwrap(), before.clone());
        for (key, _) in &doomed {
            prop_assert_eq!(storage.get(&TOP, key).unwrap(), before.get(key).cloned());
        }
    }

    #[test]
    fn root_is_a_function_of_resolved_state(
        entries in base_entries(),
        ops in prop::collection::vec(op(), 0..24),
        split in 0usize..24,
        v1 in any::<bool>(),
    ) {
        let version = if v1 { StateVersion::V1 } else { StateVersion::V0 };

        let mut model = entries.clone();
        for (key, value) in &ops {
            match value {
                Some(v) => { model.insert(key.clone(), v.clone()); }
                None => { model.remove(key); }
            }
        }

        let split = split.min(ops.len());
        let mut storage = storage_over(&entries);
        apply(&mut storage, &ops[..split]);
        storage.begin_transaction().unwrap();
        apply(&mut storage, &ops[split..]);
        storage.commit_transaction().unwrap();

        let expected = trie_root(&model, version).unwrap();
        prop_assert_eq!(storage.root(&TOP, version).unwrap(), expected);

        // The same final mapping written directly over an empty base.
        let mut direct = storage_over(&BTreeMap::new());
        for (key, value) in model.iter().rev() {
            direct.set(&TOP, key.clone(), value.clone()).unwrap();
        }
        prop_assert_eq!(direct.root(&TOP, version).unwrap(), expected);
    }

    #[test]
    fn cursor_clears_cover_exactly_the_prefix(
        seed in any::<u64>(),
        count in 0usize..40,
        limit in 0u32..6,
    ) {
        let entries = prefixed_entries(seed, &[b"aa", b"ab", b"b"], count);
        let expected = keys_with_prefix(&entries, b"a");
        let mut storage = storage_over(&entries);

        let mut deleted = 0u32;
        let mut cursor: Option<Vec<u8>> = None;
        let mut rounds = 0;
        loop {
            let outcome = storage
                .clear_prefix(&TOP, b"a", Some(limit.max(1)), cursor.as_deref())
                .unwrap();
            deleted += outcome.deleted;
            cursor = outcome.cursor;
            rounds += 1;
            if cursor.is_none() {
                break;
            }
            prop_assert!(rounds <= expected.len() + 1);
        }

        prop_assert_eq!(deleted as usize, expected.len());
        for key in &expected {
            prop_assert!(!storage.exists(&TOP, key).unwrap());
        }
        for (key, value) in entries.iter().filter(|(k, _)| !k.starts_with(b"a")) {
            prop_assert_eq!(storage.get(&TOP, key).unwrap(), Some(value.clone()));
        }
        let presence = storage.clear_prefix(&TOP, b"a", Some(0), None).unwrap();
        prop_assert_eq!(presence.cursor, None);
    }

    #[test]
    fn ordered_root_depends_on_order(
        x in prop::collection::vec(any::<u8>(), 0..40),
        y in prop::collection::vec(any::<u8>(), 0..40),
    ) {
        prop_assume!(x != y);
        let xy = ordered_root(&[x.clone(), y.clone()], StateVersion::V0).unwrap();
        let yx = ordered_root(&[y, x], StateVersion::V0).unwrap();
        prop_assert_ne!(xy, yx);
        prop_assert_ne!(xy, empty_root().unwrap());
    }
}
