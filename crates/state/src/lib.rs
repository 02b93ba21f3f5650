// Path: crates/state/src/lib.rs
//! # Sandbox Host State Crate Lints
//!
//! This crate enforces a strict set of lints to ensure high-quality,
//! panic-free code. Panics are disallowed in non-test code to promote
//! robust error handling.
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::indexing_slicing
    )
)]
//! # Sandbox Host State
//!
//! The transactional, trie-committed key-value engine behind the `storage.*`
//! and `trie.*` host calls:
//!
//! - [`backend`]: the shared, committed base store.
//! - [`overlay`]: frames of staged writes and the arena that stacks them.
//! - [`storage`]: the per-context façade implementing get/set/append/clear_prefix
//!   and nested transactions.
//! - [`trie`]: the canonical Patricia trie commitment over a resolved store.

pub mod backend;
pub mod overlay;
pub mod storage;
pub mod trie;

/// A prelude for easily importing the most common types.
pub mod prelude {
    pub use crate::backend::InMemoryBackend;
    pub use crate::storage::TransactionalStorage;
    pub use crate::trie::{ordered_root, trie_root, RootHash};
}
