// Path: crates/test_utils/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # Sandbox Host Test Utilities
//!
//! Assertion macros, a seeded RNG and key/value fixtures shared by the
//! workspace's tests.

pub mod assertions;
pub mod fixtures;
pub mod randomness;
