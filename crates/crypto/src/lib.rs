// Path: crates/crypto/src/lib.rs
//! # Sandbox Host Crypto Crate Lints
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
//! # Sandbox Host Cryptography
//!
//! dcrypt-backed hashing and Ed25519, the rayon batch verifier, the
//! accumulate-then-finalize verification session and the in-memory keystore.

pub mod algorithms;
pub mod error;
pub mod keystore;
pub mod sign;
