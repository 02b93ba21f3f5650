// Path: crates/state/src/trie/node.rs

//! Node definitions and hashing for the Patricia trie.
//!
//! Nodes are SCALE-encoded and hashed with SHA-256. Every node is referenced by
//! hash, never inlined, so the encoding of a key set is unique.

use parity_scale_codec::{Decode, Encode};
use sbx_api::error::StateError;
use sbx_crypto::algorithms::hash::sha256;
use sbx_types::state::StateVersion;

pub type NodeHash = [u8; 32];

/// How a value is committed inside its node.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub enum NodeValue {
    /// The value bytes themselves.
    Inline(Vec<u8>),
    /// The SHA-256 of the value.
    Hashed(NodeHash),
}

impl NodeValue {
    pub fn new(value: &[u8], version: StateVersion) -> Result<Self, StateError> {
        if version.hashes_value(value.len()) {
            Ok(NodeValue::Hashed(hash_bytes(value)?))
        } else {
            Ok(NodeValue::Inline(value.to_vec()))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct LeafNode {
    /// Remaining nibbles of the key below the parent.
    pub partial: Vec<u8>,
    pub value: NodeValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct BranchNode {
    /// Nibbles shared by every key below this branch.
    pub partial: Vec<u8>,
    /// Sparse children, ascending by nibble.
    pub children: Vec<(u8, NodeHash)>,
    /// The value of the key that ends exactly at this branch.
    pub value: Option<NodeValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub enum Node {
    /// The empty trie.
    Empty,
    Leaf(LeafNode),
    Branch(BranchNode),
}

impl Node {
    pub fn hash(&self) -> Result<NodeHash, StateError> {
        hash_bytes(&self.encode())
    }
}

pub(crate) fn hash_bytes(bytes: &[u8]) -> Result<NodeHash, StateError> {
    sha256(bytes).map_err(|e| StateError::Commitment(e.to_string()))
}
