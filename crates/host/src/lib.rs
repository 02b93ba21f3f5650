// Path: crates/host/src/lib.rs
//! # Sandbox Host Dispatch Crate Lints
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
        clippy::todo,
        clippy::unimplemented,
        clippy::indexing_slicing
    )
)]
//! # Sandbox Host Dispatch
//!
//! The execution context owns everything one runtime module instance may touch:
//! its transaction stack, its batch verification session and its keystore.
//! Every [`HostCall`](sbx_api::host::HostCall) is dispatched against it by one
//! exhaustive match. Native builds get [`NativeDispatcher`], which serves nothing.

pub mod context;
pub mod logging;
pub mod native;

pub use context::ExecutionContext;
pub use native::NativeDispatcher;

/// A prelude for easily importing the most common types.
pub mod prelude {
    pub use crate::context::ExecutionContext;
    pub use crate::native::NativeDispatcher;
    pub use sbx_api::host::{HostCall, HostDispatch, HostReturn};
}
