// Path: crates/types/src/runtime.rs

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Describes a runtime module build, as returned by `misc.runtime_version`.
#[derive(Serialize, Deserialize, Encode, Decode, Debug, Clone, PartialEq, Eq)]
pub struct RuntimeVersion {
    /// The identifier of the runtime's specification.
    pub spec_name: String,
    /// The identifier of the implementation of the specification.
    pub impl_name: String,
    /// The version of the authorship interface.
    pub authoring_version: u32,
    /// The version of the runtime specification.
    pub spec_version: u32,
    /// The version of the implementation of the specification.
    pub impl_version: u32,
    /// Supported API identifiers and their versions.
    pub apis: Vec<([u8; 8], u32)>,
    /// The version of the extrinsic format.
    pub transaction_version: u32,
    /// The state layout version the runtime commits with.
    pub state_version: u8,
}
