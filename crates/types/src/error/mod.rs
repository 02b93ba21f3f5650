// Path: crates/types/src/error/mod.rs
//! Core error types for the sandbox host.

use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// Errors related to the transactional storage engine and its trie commitment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// A commit or rollback was issued while no transaction was open.
    #[error("No transaction is open")]
    NoOpenTransaction,
    /// A transaction was opened beyond the configured nesting limit.
    #[error("Transaction depth limit of {0} exceeded")]
    TransactionDepthExceeded(usize),
    /// The committed change set was requested while transactions were still open.
    #[error("{0} transaction(s) still open")]
    TransactionsStillOpen(usize),
    /// A write targeted a key the host reserves for child store roots.
    #[error("Reserved key cannot be written directly: {0}")]
    ReservedKey(String),
    /// A clear-prefix cursor did not belong to the prefix it was presented with.
    #[error("Invalid clear-prefix cursor: {0}")]
    InvalidCursor(String),
    /// An error occurred in the committed base backend.
    #[error("State backend error: {0}")]
    Backend(String),
    /// The provided value was invalid.
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    /// A stored value could not be decoded in the expected encoding.
    #[error("Decode error: {0}")]
    Decode(String),
    /// Hashing a trie node failed.
    #[error("Commitment error: {0}")]
    Commitment(String),
}

impl ErrorCode for StateError {
    fn code(&self) -> &'static str {
        match self {
            Self::NoOpenTransaction => "STATE_NO_OPEN_TRANSACTION",
            Self::TransactionDepthExceeded(_) => "STATE_TRANSACTION_DEPTH_EXCEEDED",
            Self::TransactionsStillOpen(_) => "STATE_TRANSACTIONS_STILL_OPEN",
            Self::ReservedKey(_) => "STATE_RESERVED_KEY",
            Self::InvalidCursor(_) => "STATE_INVALID_CURSOR",
            Self::Backend(_) => "STATE_BACKEND_ERROR",
            Self::InvalidValue(_) => "STATE_INVALID_VALUE",
            Self::Decode(_) => "STATE_DECODE_ERROR",
            Self::Commitment(_) => "STATE_COMMITMENT_ERROR",
        }
    }
}

/// Errors related to cryptographic primitives and the batch verification session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// The signature failed cryptographic verification.
    #[error("Signature verification failed")]
    VerificationFailed,
    /// The provided key material is malformed or invalid for the specified algorithm.
    #[error("Invalid cryptographic key: {0}")]
    InvalidKey(String),
    /// The provided signature material is malformed or invalid for the specified algorithm.
    #[error("Invalid signature format: {0}")]
    InvalidSignature(String),
    /// A hash digest had an unexpected length.
    #[error("Invalid hash length: expected {expected}, got {got}")]
    InvalidHashLength {
        /// The expected length in bytes.
        expected: usize,
        /// The actual length in bytes.
        got: usize,
    },
    /// A generic failure in an underlying cryptographic library.
    #[error("Cryptographic operation failed: {0}")]
    OperationFailed(String),
    /// The requested cryptographic operation or parameter is not supported.
    #[error("Unsupported cryptographic operation or parameter: {0}")]
    Unsupported(String),
    /// A batch verification session was started while another was open.
    #[error("A batch verification session is already open")]
    BatchSessionAlreadyOpen,
    /// A batch verification call was made while no session was open.
    #[error("No batch verification session is open")]
    NoBatchSession,
}

impl ErrorCode for CryptoError {
    fn code(&self) -> &'static str {
        match self {
            Self::VerificationFailed => "CRYPTO_VERIFICATION_FAILED",
            Self::InvalidKey(_) => "CRYPTO_INVALID_KEY",
            Self::InvalidSignature(_) => "CRYPTO_INVALID_SIGNATURE",
            Self::InvalidHashLength { .. } => "CRYPTO_INVALID_HASH_LENGTH",
            Self::OperationFailed(_) => "CRYPTO_OPERATION_FAILED",
            Self::Unsupported(_) => "CRYPTO_UNSUPPORTED",
            Self::BatchSessionAlreadyOpen => "CRYPTO_BATCH_SESSION_ALREADY_OPEN",
            Self::NoBatchSession => "CRYPTO_NO_BATCH_SESSION",
        }
    }
}

impl From<dcrypt::Error> for CryptoError {
    fn from(e: dcrypt::Error) -> Self {
        CryptoError::OperationFailed(e.to_string())
    }
}

/// Errors related to the WebAssembly engine hosting the runtime module.
#[derive(Error, Debug)]
pub enum VmError {
    /// The VM failed to initialize.
    #[error("VM initialization failed: {0}")]
    Initialization(String),
    /// The provided module bytecode was invalid.
    #[error("Invalid bytecode: {0}")]
    InvalidBytecode(String),
    /// The module execution trapped (e.g., memory access error, host fault).
    #[error("Execution trapped: {0}")]
    ExecutionTrap(String),
    /// The execution ran out of fuel and the context was terminated.
    #[error("Execution ran out of fuel after {0} units")]
    OutOfFuel(u64),
    /// The requested export was not found in the module.
    #[error("Function not found in module: {0}")]
    FunctionNotFound(String),
    /// An error occurred within a host function called by the module.
    #[error("Host function error: {0}")]
    HostError(String),
    /// A memory allocation or access error occurred within the VM.
    #[error("Memory allocation/access error in VM: {0}")]
    MemoryError(String),
}

impl ErrorCode for VmError {
    fn code(&self) -> &'static str {
        match self {
            Self::Initialization(_) => "VM_INITIALIZATION_FAILED",
            Self::InvalidBytecode(_) => "VM_INVALID_BYTECODE",
            Self::ExecutionTrap(_) => "VM_EXECUTION_TRAP",
            Self::OutOfFuel(_) => "VM_OUT_OF_FUEL",
            Self::FunctionNotFound(_) => "VM_FUNCTION_NOT_FOUND",
            Self::HostError(_) => "VM_HOST_ERROR",
            Self::MemoryError(_) => "VM_MEMORY_ERROR",
        }
    }
}

/// The failure taxonomy of a single host call.
///
/// Every variant is fatal to the calling execution context: the engine turns it
/// into a trap. Recoverable outcomes (a bad signature, a missing key) are never
/// faults; they travel back as ordinary return values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostFault {
    /// The caller broke the boundary protocol (commit without a transaction,
    /// verify while no batch session is open, double start, double free).
    #[error("Boundary contract violation: {0}")]
    ContractViolation(String),
    /// A stored value or argument was not in the encoding the call requires.
    #[error("Data shape violation: {0}")]
    DataShape(String),
    /// The committed base or a cryptographic backend failed.
    #[error("Backend failure: {0}")]
    Backend(String),
    /// A pointer/length pair fell outside guest memory.
    #[error("Memory access violation: {0}")]
    Memory(String),
    /// A host call was issued against the native dispatcher, which serves none.
    #[error("Host call '{0}' is not available outside the sandbox")]
    NativeCall(&'static str),
    /// The call names an algorithm or feature this host does not serve.
    #[error("Unsupported host call: {0}")]
    Unsupported(String),
}

impl ErrorCode for HostFault {
    fn code(&self) -> &'static str {
        match self {
            Self::ContractViolation(_) => "HOST_CONTRACT_VIOLATION",
            Self::DataShape(_) => "HOST_DATA_SHAPE",
            Self::Backend(_) => "HOST_BACKEND_FAILURE",
            Self::Memory(_) => "HOST_MEMORY_VIOLATION",
            Self::NativeCall(_) => "HOST_NATIVE_CALL",
            Self::Unsupported(_) => "HOST_UNSUPPORTED",
        }
    }
}

impl From<StateError> for HostFault {
    fn from(e: StateError) -> Self {
        match e {
            StateError::NoOpenTransaction
            | StateError::TransactionDepthExceeded(_)
            | StateError::TransactionsStillOpen(_)
            | StateError::ReservedKey(_)
            | StateError::InvalidCursor(_) => HostFault::ContractViolation(e.to_string()),
            StateError::Decode(_) | StateError::InvalidValue(_) => {
                HostFault::DataShape(e.to_string())
            }
            StateError::Backend(_) | StateError::Commitment(_) => {
                HostFault::Backend(e.to_string())
            }
        }
    }
}

impl From<CryptoError> for HostFault {
    fn from(e: CryptoError) -> Self {
        match e {
            CryptoError::BatchSessionAlreadyOpen | CryptoError::NoBatchSession => {
                HostFault::ContractViolation(e.to_string())
            }
            CryptoError::Unsupported(_) => HostFault::Unsupported(e.to_string()),
            CryptoError::InvalidHashLength { .. } | CryptoError::OperationFailed(_) => {
                HostFault::Backend(e.to_string())
            }
            CryptoError::VerificationFailed
            | CryptoError::InvalidKey(_)
            | CryptoError::InvalidSignature(_) => HostFault::DataShape(e.to_string()),
        }
    }
}

/// General errors outside the per-call taxonomy (configuration, setup).
#[derive(Debug, Error)]
pub enum CoreError {
    /// The host configuration could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),
    /// An error originating from a cryptographic operation.
    #[error("Crypto error: {0}")]
    Crypto(String),
    /// A custom, unspecified error.
    #[error("Custom error: {0}")]
    Custom(String),
}

impl ErrorCode for CoreError {
    fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CORE_CONFIG_ERROR",
            Self::Crypto(_) => "CORE_CRYPTO_ERROR",
            Self::Custom(_) => "CORE_CUSTOM_ERROR",
        }
    }
}

impl From<CryptoError> for CoreError {
    fn from(e: CryptoError) -> Self {
        CoreError::Crypto(e.to_string())
    }
}
