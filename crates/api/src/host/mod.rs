// Path: crates/api/src/host/mod.rs
//! The closed call surface between a runtime module and its host.
//!
//! [`HostCall`] enumerates every context-level operation with decoded, owned
//! arguments; [`HostReturn`] enumerates every result shape. The engine-facing
//! import names live in [`HostFunction`]: a new behavior gets a new numbered
//! variant there, existing variants never change meaning.

use crate::error::HostFault;
use crate::state::{ClearPrefixOutcome, StoreId};
use sbx_types::app::KeyTypeId;
use sbx_types::config::LogLevel;
use sbx_types::state::StateVersion;

mod functions;

pub use functions::HostFunction;

/// The hashing algorithms served by `hashing.*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    /// SHA2-256, 32-byte digest.
    Sha2_256,
    /// SHA2-512, 64-byte digest.
    Sha2_512,
    /// Keccak-256, 32-byte digest.
    Keccak256,
    /// BLAKE2b-512, 64-byte digest.
    Blake2b512,
    /// BLAKE2s-256, 32-byte digest.
    Blake2s256,
}

impl HashAlgorithm {
    /// Output width in bytes.
    pub fn output_len(self) -> usize {
        match self {
            HashAlgorithm::Sha2_256 | HashAlgorithm::Keccak256 | HashAlgorithm::Blake2s256 => 32,
            HashAlgorithm::Sha2_512 | HashAlgorithm::Blake2b512 => 64,
        }
    }
}

/// A context-level host call with decoded arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    /// `storage.get`
    StorageGet {
        /// Addressed store.
        store: StoreId,
        /// Key to resolve.
        key: Vec<u8>,
    },
    /// `storage.read`: the value from `offset` onward.
    StorageRead {
        /// Addressed store.
        store: StoreId,
        /// Key to resolve.
        key: Vec<u8>,
        /// Byte offset into the value.
        offset: u32,
    },
    /// `storage.exists`
    StorageExists {
        /// Addressed store.
        store: StoreId,
        /// Key to test.
        key: Vec<u8>,
    },
    /// `storage.next_key`
    StorageNextKey {
        /// Addressed store.
        store: StoreId,
        /// Exclusive lower bound.
        key: Vec<u8>,
    },
    /// `storage.set`
    StorageSet {
        /// Addressed store.
        store: StoreId,
        /// Key to write.
        key: Vec<u8>,
        /// New value.
        value: Vec<u8>,
    },
    /// `storage.clear`
    StorageClear {
        /// Addressed store.
        store: StoreId,
        /// Key to tombstone.
        key: Vec<u8>,
    },
    /// `storage.append`
    StorageAppend {
        /// Key holding the aggregate.
        key: Vec<u8>,
        /// One already-encoded item.
        item: Vec<u8>,
    },
    /// `storage.clear_prefix`
    StorageClearPrefix {
        /// Addressed store.
        store: StoreId,
        /// Byte prefix to clear.
        prefix: Vec<u8>,
        /// Maximum deletions; `None` is unbounded.
        limit: Option<u32>,
        /// Resume point returned by a previous call.
        cursor: Option<Vec<u8>>,
    },
    /// `child_storage.storage_kill`: tombstone every key of a child store.
    StorageKillChild {
        /// Child selector.
        child: Vec<u8>,
    },
    /// `storage.start_transaction`
    StartTransaction,
    /// `storage.commit_transaction`
    CommitTransaction,
    /// `storage.rollback_transaction`
    RollbackTransaction,
    /// `storage.root`
    StorageRoot {
        /// Addressed store.
        store: StoreId,
        /// Layout version; `None` uses the configured default.
        version: Option<StateVersion>,
    },
    /// `trie.ordered_root`
    TrieOrderedRoot {
        /// The ordered list, keyed by index.
        items: Vec<Vec<u8>>,
        /// Layout version.
        version: StateVersion,
    },
    /// `crypto.start_batch_verify`
    StartBatchVerify,
    /// `crypto.finish_batch_verify`
    FinishBatchVerify,
    /// `crypto.ed25519_verify`: checked immediately, outside any session.
    Ed25519Verify {
        /// 64-byte signature.
        signature: Vec<u8>,
        /// Signed message.
        message: Vec<u8>,
        /// 32-byte public key.
        public_key: Vec<u8>,
    },
    /// `crypto.ed25519_batch_verify`: queued into the open session.
    Ed25519BatchVerify {
        /// 64-byte signature.
        signature: Vec<u8>,
        /// Signed message.
        message: Vec<u8>,
        /// 32-byte public key.
        public_key: Vec<u8>,
    },
    /// `crypto.ed25519_generate`
    Ed25519Generate {
        /// Keystore partition.
        key_type: KeyTypeId,
        /// Optional seed phrase; a fresh random key when absent.
        seed: Option<Vec<u8>>,
    },
    /// `crypto.ed25519_sign`
    Ed25519Sign {
        /// Keystore partition.
        key_type: KeyTypeId,
        /// Public key identifying the signing key.
        public_key: [u8; 32],
        /// Message to sign.
        message: Vec<u8>,
    },
    /// `crypto.ed25519_public_keys`
    Ed25519PublicKeys {
        /// Keystore partition.
        key_type: KeyTypeId,
    },
    /// `hashing.*`
    Hash {
        /// Algorithm to apply.
        algorithm: HashAlgorithm,
        /// Input bytes.
        data: Vec<u8>,
    },
    /// `logging.log`
    Log {
        /// Severity.
        level: LogLevel,
        /// Runtime-side target.
        target: Vec<u8>,
        /// Message bytes, usually UTF-8.
        message: Vec<u8>,
    },
    /// `logging.max_level`
    MaxLevel,
    /// `misc.print_hex`
    PrintHex(Vec<u8>),
    /// `misc.print_utf8`
    PrintUtf8(Vec<u8>),
    /// `misc.print_num`
    PrintNum(u64),
    /// `misc.runtime_version`
    RuntimeVersion {
        /// Code blob whose version is requested.
        code: Vec<u8>,
    },
}

impl HostCall {
    /// A stable label for logging and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            HostCall::StorageGet { .. } => "storage.get",
            HostCall::StorageRead { .. } => "storage.read",
            HostCall::StorageExists { .. } => "storage.exists",
            HostCall::StorageNextKey { .. } => "storage.next_key",
            HostCall::StorageSet { .. } => "storage.set",
            HostCall::StorageClear { .. } => "storage.clear",
            HostCall::StorageAppend { .. } => "storage.append",
            HostCall::StorageClearPrefix { .. } => "storage.clear_prefix",
            HostCall::StorageKillChild { .. } => "child_storage.storage_kill",
            HostCall::StartTransaction => "storage.start_transaction",
            HostCall::CommitTransaction => "storage.commit_transaction",
            HostCall::RollbackTransaction => "storage.rollback_transaction",
            HostCall::StorageRoot { .. } => "storage.root",
            HostCall::TrieOrderedRoot { .. } => "trie.ordered_root",
            HostCall::StartBatchVerify => "crypto.start_batch_verify",
            HostCall::FinishBatchVerify => "crypto.finish_batch_verify",
            HostCall::Ed25519Verify { .. } => "crypto.ed25519_verify",
            HostCall::Ed25519BatchVerify { .. } => "crypto.ed25519_batch_verify",
            HostCall::Ed25519Generate { .. } => "crypto.ed25519_generate",
            HostCall::Ed25519Sign { .. } => "crypto.ed25519_sign",
            HostCall::Ed25519PublicKeys { .. } => "crypto.ed25519_public_keys",
            HostCall::Hash { .. } => "hashing",
            HostCall::Log { .. } => "logging.log",
            HostCall::MaxLevel => "logging.max_level",
            HostCall::PrintHex(_) => "misc.print_hex",
            HostCall::PrintUtf8(_) => "misc.print_utf8",
            HostCall::PrintNum(_) => "misc.print_num",
            HostCall::RuntimeVersion { .. } => "misc.runtime_version",
        }
    }
}

/// The result of a successfully dispatched [`HostCall`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostReturn {
    /// The call produces nothing.
    Unit,
    /// A boolean outcome (existence, signature validity, batch result).
    Bool(bool),
    /// An optional value or key.
    Bytes(Option<Vec<u8>>),
    /// The packed outcome of a prefix clear.
    ClearPrefix(ClearPrefixOutcome),
    /// A 32-byte digest or root.
    Hash32([u8; 32]),
    /// A 64-byte digest.
    Hash64([u8; 64]),
    /// A freshly generated public key.
    PublicKey([u8; 32]),
    /// A signature, or `None` when the keystore holds no matching key.
    Signature(Option<[u8; 64]>),
    /// Every public key of a keystore partition.
    PublicKeys(Vec<[u8; 32]>),
    /// The maximum log level.
    LogLevel(LogLevel),
}

/// The dispatch seam: one call in, one result or fault out.
///
/// Implemented by the execution context for sandboxed execution and by a
/// faulting stub for native builds.
pub trait HostDispatch {
    /// Executes one host call against this dispatcher's state.
    fn dispatch(&mut self, call: HostCall) -> Result<HostReturn, HostFault>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_widths() {
        assert_eq!(HashAlgorithm::Sha2_256.output_len(), 32);
        assert_eq!(HashAlgorithm::Blake2b512.output_len(), 64);
        assert_eq!(HashAlgorithm::Sha2_512.output_len(), 64);
    }
}
