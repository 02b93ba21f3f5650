// Path: crates/state/src/trie/mod.rs

//! The trie commitment engine.
//!
//! A canonical 16-ary Patricia trie over the nibbles of each key. The root is a
//! pure function of the key/value set: the builder consumes entries in key order
//! and the shape of the trie depends only on which keys are present.

use sbx_api::error::StateError;
use sbx_types::state::StateVersion;
use std::collections::BTreeMap;

pub mod nibble;
pub mod node;

use nibble::NibblePath;
use node::{BranchNode, LeafNode, Node, NodeHash, NodeValue};

/// A 32-byte root digest.
pub type RootHash = NodeHash;

/// The root of a trie with no entries.
pub fn empty_root() -> Result<RootHash, StateError> {
    Node::Empty.hash()
}

/// Computes the root over `entries`.
pub fn trie_root(
    entries: &BTreeMap<Vec<u8>, Vec<u8>>,
    version: StateVersion,
) -> Result<RootHash, StateError> {
    let paths: Vec<(NibblePath, &[u8])> = entries
        .iter()
        .map(|(k, v)| (NibblePath::new(k), v.as_slice()))
        .collect();
    if paths.is_empty() {
        return empty_root();
    }
    build(&paths, version)
}

/// Computes the root over a list keyed by each element's index as a big-endian `u32`.
///
/// Nothing is read from or written to storage.
pub fn ordered_root<T: AsRef<[u8]>>(
    items: &[T],
    version: StateVersion,
) -> Result<RootHash, StateError> {
    let mut entries = BTreeMap::new();
    for (index, item) in items.iter().enumerate() {
        let index = u32::try_from(index)
            .map_err(|_| StateError::InvalidValue(format!("list index {} exceeds u32", index)))?;
        entries.insert(index.to_be_bytes().to_vec(), item.as_ref().to_vec());
    }
    trie_root(&entries, version)
}

/// A branch whose children are still being hashed.
struct PendingBranch {
    /// The nibble selecting this branch under its parent.
    nibble: u8,
    partial: Vec<u8>,
    value: Option<NodeValue>,
    children: Vec<(u8, NodeHash)>,
    /// Nibble position at which this branch splits its entries.
    shared: usize,
    /// Next unconsumed entry index.
    next: usize,
    end: usize,
}

enum Opened {
    Hashed(NodeHash),
    Branch(PendingBranch),
}

/// Starts the subtrie over `entries[lo..hi]`, all of which share their first
/// `depth` nibbles. Single entries are hashed as leaves at once.
fn open(
    entries: &[(NibblePath, &[u8])],
    lo: usize,
    hi: usize,
    depth: usize,
    nibble: u8,
    version: StateVersion,
) -> Result<Opened, StateError> {
    let group = entries.get(lo..hi).unwrap_or(&[]);
    let (Some(first), Some(last)) = (group.first(), group.last()) else {
        return Ok(Opened::Hashed(empty_root()?));
    };

    if group.len() == 1 {
        let leaf = LeafNode {
            partial: first.0.slice(depth, first.0.len()).to_vec(),
            value: NodeValue::new(first.1, version)?,
        };
        return Ok(Opened::Hashed(Node::Leaf(leaf).hash()?));
    }

    // In sorted order the longest shared prefix is the one between the extremes.
    let shared = first.0.common_prefix(&last.0);
    let (value, next) = if first.0.len() == shared {
        (Some(NodeValue::new(first.1, version)?), lo + 1)
    } else {
        (None, lo)
    };
    Ok(Opened::Branch(PendingBranch {
        nibble,
        partial: first.0.slice(depth, shared).to_vec(),
        value,
        children: Vec::new(),
        shared,
        next,
        end: hi,
    }))
}

/// Builds the trie over sorted, non-empty `entries` and returns its root hash.
///
/// The walk is post-order over an explicit stack, so nesting depth is bounded
/// by the heap rather than the thread stack.
fn build(entries: &[(NibblePath, &[u8])], version: StateVersion) -> Result<NodeHash, StateError> {
    let mut stack = match open(entries, 0, entries.len(), 0, 0, version)? {
        Opened::Hashed(hash) => return Ok(hash),
        Opened::Branch(root) => vec![root],
    };

    while let Some(top) = stack.last_mut() {
        if top.next < top.end {
            let start = top.next;
            let Some(nibble) = entries
                .get(start)
                .and_then(|(path, _)| path.get_nibble(top.shared))
            else {
                return Err(StateError::Commitment(
                    "trie entries out of order".to_string(),
                ));
            };
            let run = entries
                .get(start..top.end)
                .unwrap_or(&[])
                .iter()
                .take_while(|(p, _)| p.get_nibble(top.shared) == Some(nibble))
                .count();
            top.next = start + run;
            match open(entries, start, start + run, top.shared + 1, nibble, version)? {
                Opened::Hashed(hash) => top.children.push((nibble, hash)),
                Opened::Branch(child) => stack.push(child),
            }
            continue;
        }

        let Some(done) = stack.pop() else { break };
        let hash = Node::Branch(BranchNode {
            partial: done.partial,
            children: done.children,
            value: done.value,
        })
        .hash()?;
        match stack.last_mut() {
            Some(parent) => parent.children.push((done.nibble, hash)),
            None => return Ok(hash),
        }
    }
    Err(StateError::Commitment("trie walk ended without a root".to_string()))
}

/// Hex rendering of a root, for logs.
pub fn root_hex(root: &RootHash) -> String {
    hex::encode(root)
}
