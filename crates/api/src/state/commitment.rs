// Path: crates/api/src/state/commitment.rs
//! Defines the `VerifiableState` trait for stores that produce a cryptographic commitment.

use crate::error::StateError;
use crate::state::StoreId;
use sbx_types::state::StateVersion;

/// A trait for any stateful data structure that can produce a single, verifiable
/// cryptographic commitment over the resolved contents of one of its stores.
///
/// The commitment must be a pure function of the resolved key/value mapping:
/// the order and nesting of the writes that produced it are irrelevant.
pub trait VerifiableState {
    /// The commitment type (e.g., a 32-byte hash).
    type Commitment: Clone + Send + Sync + 'static;

    /// Computes the root commitment of `store` under the given layout version.
    fn root_commitment(
        &self,
        store: &StoreId,
        version: StateVersion,
    ) -> Result<Self::Commitment, StateError>;
}
