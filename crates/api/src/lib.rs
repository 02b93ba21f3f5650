// Path: crates/api/src/lib.rs

//! # Sandbox Host API Crate Lints
//!
//! This crate enforces a strict set of lints: panics are disallowed in non-test
//! code to promote robust error handling.
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::todo,
        clippy::unimplemented,
        clippy::indexing_slicing
    )
)]
//! # Sandbox Host API
//!
//! Core traits and the closed, versioned call surface shared by the storage
//! engine, the crypto crate, the execution context and the wasm runtime.

/// Defines unified traits for cryptographic primitives.
pub mod crypto;
/// Re-exports all core error types from the central `sbx-types` crate.
pub mod error;
/// The closed enumeration of host calls and their versioned import names.
pub mod host;
/// Core traits for the committed base store and state commitments.
pub mod state;

/// A curated set of the most commonly used traits and types.
pub mod prelude {
    pub use crate::crypto::{BatchVerifier, SerializableKey, SigningKey, VerifyingKey};
    pub use crate::host::{HostCall, HostDispatch, HostFunction, HostReturn};
    pub use crate::state::{CommittableBackend, StateBackend, StoreId, VerifiableState};
}
