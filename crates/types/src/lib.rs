// Path: crates/types/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! # Sandbox Host Types
//!
//! The foundational crate of the sandbox host workspace: error taxonomy, host
//! configuration, the canonical SCALE codec helpers and the small value types
//! shared by the state, crypto and runtime crates.
//!
//! ## Architectural Role
//!
//! `sbx-types` has minimal dependencies and is itself a dependency of every other
//! crate in the workspace, which keeps the dependency graph acyclic and gives the
//! boundary a single definition of types such as `StateVersion` and `HostFault`.

/// A top-level, crate-wide `Result` type alias with a default error type.
pub type Result<T, E = crate::error::CoreError> = std::result::Result<T, E>;

/// Identifiers for signature algorithms and keystore partitions.
pub mod app;
/// The canonical, deterministic binary codec used across the boundary.
pub mod codec;
/// Host configuration loaded from TOML.
pub mod config;
/// A unified set of all error types used across the workspace.
pub mod error;
/// Well-known storage keys.
pub mod keys;
/// Runtime version descriptors reported through `misc.runtime_version`.
pub mod runtime;
/// State layout versions accepted by the trie commitment engine.
pub mod state;
