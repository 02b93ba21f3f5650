// Path: crates/vm/wasm/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::indexing_slicing
    )
)]
//! # Sandbox Host Wasm Runtime
//!
//! Hosts a runtime module in wasmtime and links every numbered host function
//! into its `env` imports. Buffers cross the boundary as packed 64-bit words
//! (address in the low half, length in the high half); results the host
//! produces are placed in guest memory by the same freeing-bump allocator the
//! module uses through `ext_allocator_*`.

pub mod allocator;
mod imports;
pub mod memory;
mod runtime;

pub use runtime::{CallOutcome, WasmRuntime};
