// Path: crates/api/src/host/functions.rs
//! The versioned import names a runtime module links against.

/// Every host function the runtime module may import from module `env`.
///
/// Names carry a `_version_N` suffix. Changing the behavior of a call means adding
/// a variant with a higher number; an existing variant is never repurposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostFunction {
    StorageGetV1,
    StorageExistsV1,
    StorageReadV1,
    StorageNextKeyV1,
    StorageSetV1,
    StorageClearV1,
    StorageAppendV1,
    StorageClearPrefixV2,
    StorageStartTransactionV1,
    StorageCommitTransactionV1,
    StorageRollbackTransactionV1,
    StorageRootV1,
    StorageRootV2,
    ChildStorageGetV1,
    ChildStorageSetV1,
    ChildStorageClearV1,
    ChildStorageExistsV1,
    ChildStorageNextKeyV1,
    ChildStorageClearPrefixV2,
    ChildStorageKillV1,
    ChildStorageRootV2,
    TrieOrderedRootV1,
    TrieOrderedRootV2,
    CryptoStartBatchVerifyV1,
    CryptoFinishBatchVerifyV1,
    CryptoEd25519VerifyV1,
    CryptoEd25519BatchVerifyV1,
    CryptoEd25519GenerateV1,
    CryptoEd25519SignV1,
    CryptoEd25519PublicKeysV1,
    HashingSha2_256V1,
    HashingSha2_512V1,
    HashingKeccak256V1,
    HashingBlake2b512V1,
    HashingBlake2s256V1,
    LoggingLogV1,
    LoggingMaxLevelV1,
    MiscPrintHexV1,
    MiscPrintUtf8V1,
    MiscPrintNumV1,
    MiscRuntimeVersionV1,
    AllocatorMallocV1,
    AllocatorFreeV1,
}

impl HostFunction {
    /// Every host function, in link order.
    pub const ALL: &'static [HostFunction] = &[
        HostFunction::StorageGetV1,
        HostFunction::StorageExistsV1,
        HostFunction::StorageReadV1,
        HostFunction::StorageNextKeyV1,
        HostFunction::StorageSetV1,
        HostFunction::StorageClearV1,
        HostFunction::StorageAppendV1,
        HostFunction::StorageClearPrefixV2,
        HostFunction::StorageStartTransactionV1,
        HostFunction::StorageCommitTransactionV1,
        HostFunction::StorageRollbackTransactionV1,
        HostFunction::StorageRootV1,
        HostFunction::StorageRootV2,
        HostFunction::ChildStorageGetV1,
        HostFunction::ChildStorageSetV1,
        HostFunction::ChildStorageClearV1,
        HostFunction::ChildStorageExistsV1,
        HostFunction::ChildStorageNextKeyV1,
        HostFunction::ChildStorageClearPrefixV2,
        HostFunction::ChildStorageKillV1,
        HostFunction::ChildStorageRootV2,
        HostFunction::TrieOrderedRootV1,
        HostFunction::TrieOrderedRootV2,
        HostFunction::CryptoStartBatchVerifyV1,
        HostFunction::CryptoFinishBatchVerifyV1,
        HostFunction::CryptoEd25519VerifyV1,
        HostFunction::CryptoEd25519BatchVerifyV1,
        HostFunction::CryptoEd25519GenerateV1,
        HostFunction::CryptoEd25519SignV1,
        HostFunction::CryptoEd25519PublicKeysV1,
        HostFunction::HashingSha2_256V1,
        HostFunction::HashingSha2_512V1,
        HostFunction::HashingKeccak256V1,
        HostFunction::HashingBlake2b512V1,
        HostFunction::HashingBlake2s256V1,
        HostFunction::LoggingLogV1,
        HostFunction::LoggingMaxLevelV1,
        HostFunction::MiscPrintHexV1,
        HostFunction::MiscPrintUtf8V1,
        HostFunction::MiscPrintNumV1,
        HostFunction::MiscRuntimeVersionV1,
        HostFunction::AllocatorMallocV1,
        HostFunction::AllocatorFreeV1,
    ];

    /// The import name in module `env`.
    pub fn name(self) -> &'static str {
        match self {
            HostFunction::StorageGetV1 => "ext_storage_get_version_1",
            HostFunction::StorageExistsV1 => "ext_storage_exists_version_1",
            HostFunction::StorageReadV1 => "ext_storage_read_version_1",
            HostFunction::StorageNextKeyV1 => "ext_storage_next_key_version_1",
            HostFunction::StorageSetV1 => "ext_storage_set_version_1",
            HostFunction::StorageClearV1 => "ext_storage_clear_version_1",
            HostFunction::StorageAppendV1 => "ext_storage_append_version_1",
            HostFunction::StorageClearPrefixV2 => "ext_storage_clear_prefix_version_2",
            HostFunction::StorageStartTransactionV1 => "ext_storage_start_transaction_version_1",
            HostFunction::StorageCommitTransactionV1 => "ext_storage_commit_transaction_version_1",
            HostFunction::StorageRollbackTransactionV1 => {
                "ext_storage_rollback_transaction_version_1"
            }
            HostFunction::StorageRootV1 => "ext_storage_root_version_1",
            HostFunction::StorageRootV2 => "ext_storage_root_version_2",
            HostFunction::ChildStorageGetV1 => "ext_default_child_storage_get_version_1",
            HostFunction::ChildStorageSetV1 => "ext_default_child_storage_set_version_1",
            HostFunction::ChildStorageClearV1 => "ext_default_child_storage_clear_version_1",
            HostFunction::ChildStorageExistsV1 => "ext_default_child_storage_exists_version_1",
            HostFunction::ChildStorageNextKeyV1 => "ext_default_child_storage_next_key_version_1",
            HostFunction::ChildStorageClearPrefixV2 => {
                "ext_default_child_storage_clear_prefix_version_2"
            }
            HostFunction::ChildStorageKillV1 => "ext_default_child_storage_storage_kill_version_1",
            HostFunction::ChildStorageRootV2 => "ext_default_child_storage_root_version_2",
            HostFunction::TrieOrderedRootV1 => "ext_trie_ordered_root_version_1",
            HostFunction::TrieOrderedRootV2 => "ext_trie_ordered_root_version_2",
            HostFunction::CryptoStartBatchVerifyV1 => "ext_crypto_start_batch_verify_version_1",
            HostFunction::CryptoFinishBatchVerifyV1 => "ext_crypto_finish_batch_verify_version_1",
            HostFunction::CryptoEd25519VerifyV1 => "ext_crypto_ed25519_verify_version_1",
            HostFunction::CryptoEd25519BatchVerifyV1 => "ext_crypto_ed25519_batch_verify_version_1",
            HostFunction::CryptoEd25519GenerateV1 => "ext_crypto_ed25519_generate_version_1",
            HostFunction::CryptoEd25519SignV1 => "ext_crypto_ed25519_sign_version_1",
            HostFunction::CryptoEd25519PublicKeysV1 => "ext_crypto_ed25519_public_keys_version_1",
            HostFunction::HashingSha2_256V1 => "ext_hashing_sha2_256_version_1",
            HostFunction::HashingSha2_512V1 => "ext_hashing_sha2_512_version_1",
            HostFunction::HashingKeccak256V1 => "ext_hashing_keccak_256_version_1",
            HostFunction::HashingBlake2b512V1 => "ext_hashing_blake2b_512_version_1",
            HostFunction::HashingBlake2s256V1 => "ext_hashing_blake2s_256_version_1",
            HostFunction::LoggingLogV1 => "ext_logging_log_version_1",
            HostFunction::LoggingMaxLevelV1 => "ext_logging_max_level_version_1",
            HostFunction::MiscPrintHexV1 => "ext_misc_print_hex_version_1",
            HostFunction::MiscPrintUtf8V1 => "ext_misc_print_utf8_version_1",
            HostFunction::MiscPrintNumV1 => "ext_misc_print_num_version_1",
            HostFunction::MiscRuntimeVersionV1 => "ext_misc_runtime_version_version_1",
            HostFunction::AllocatorMallocV1 => "ext_allocator_malloc_version_1",
            HostFunction::AllocatorFreeV1 => "ext_allocator_free_version_1",
        }
    }

    /// Looks up a host function by its import name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }
}
