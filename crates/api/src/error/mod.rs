// Path: crates/api/src/error/mod.rs
// Re-export all core error types from the central types crate.
pub use sbx_types::error::{CoreError, CryptoError, ErrorCode, HostFault, StateError, VmError};
pub use sbx_types::Result;
