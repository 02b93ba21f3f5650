// Path: crates/host/src/context/mod.rs
//! The execution context of one runtime module instance.

use crate::logging;
use sbx_api::error::{ErrorCode, HostFault};
use sbx_api::host::{HashAlgorithm, HostCall, HostDispatch, HostReturn};
use sbx_api::state::{StateBackend, StorageChanges, StoreId};
use sbx_crypto::algorithms::hash::{digest, sha256};
use sbx_crypto::keystore::Keystore;
use sbx_crypto::sign::batch::CpuBatchVerifier;
use sbx_crypto::sign::eddsa;
use sbx_crypto::sign::session::BatchVerificationSession;
use sbx_state::storage::TransactionalStorage;
use sbx_state::trie::ordered_root;
use sbx_telemetry::sinks::{ErrorMetricsSink, HostMetricsSink, StorageMetricsSink};
use sbx_telemetry::time::Timer;
use sbx_telemetry::{error_metrics, host_metrics, storage_metrics};
use sbx_types::codec::to_bytes_canonical;
use sbx_types::config::HostConfig;
use sbx_types::runtime::RuntimeVersion;
use std::collections::HashMap;
use std::sync::Arc;

#[cfg(test)]
mod tests;

/// Everything one runtime module instance may touch.
///
/// Nothing here is shared with other contexts except the read-only base store
/// behind the storage view. Calls are dispatched one at a time.
pub struct ExecutionContext {
    storage: TransactionalStorage,
    session: BatchVerificationSession<CpuBatchVerifier>,
    keystore: Keystore,
    config: HostConfig,
    /// Runtime versions by SHA-256 of the code blob.
    versions: HashMap<[u8; 32], RuntimeVersion>,
}

impl ExecutionContext {
    pub fn new(base: Arc<dyn StateBackend>, config: HostConfig) -> Self {
        let verifier = if config.batch_verify_parallel {
            CpuBatchVerifier::new()
        } else {
            CpuBatchVerifier::sequential()
        };
        Self {
            storage: TransactionalStorage::new(base, config.max_transaction_depth),
            session: BatchVerificationSession::new(verifier),
            keystore: Keystore::new(),
            config,
            versions: HashMap::new(),
        }
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    pub fn storage(&self) -> &TransactionalStorage {
        &self.storage
    }

    pub fn keystore_mut(&mut self) -> &mut Keystore {
        &mut self.keystore
    }

    /// Makes `version` the answer to `misc.runtime_version` for `code`.
    pub fn register_runtime_version(
        &mut self,
        code: &[u8],
        version: RuntimeVersion,
    ) -> Result<(), HostFault> {
        self.versions.insert(sha256(code)?, version);
        Ok(())
    }

    /// Ends the context and hands out its committed change set.
    ///
    /// An unfinished batch verification session is abandoned. Fails while a
    /// storage transaction is still open.
    pub fn into_change_set(mut self) -> Result<StorageChanges, HostFault> {
        self.session.abandon();
        let changes = self.storage.drain_committed()?;
        let entries = changes.top.0.len()
            + changes.top.1.len()
            + changes
                .children
                .values()
                .map(|(ins, del)| ins.len() + del.len())
                .sum::<usize>();
        storage_metrics().observe_drained_changes(entries as u64);
        tracing::debug!(
            target: "host",
            entries,
            children = changes.children.len(),
            "drained committed change set"
        );
        Ok(changes)
    }

    fn handle(&mut self, call: HostCall) -> Result<HostReturn, HostFault> {
        match call {
            HostCall::StorageGet { store, key } => {
                Ok(HostReturn::Bytes(self.storage.get(&store, &key)?))
            }
            HostCall::StorageRead { store, key, offset } => {
                Ok(HostReturn::Bytes(self.storage.read(&store, &key, offset)?))
            }
            HostCall::StorageExists { store, key } => {
                Ok(HostReturn::Bool(self.storage.exists(&store, &key)?))
            }
            HostCall::StorageNextKey { store, key } => {
                Ok(HostReturn::Bytes(self.storage.next_key(&store, &key)?))
            }
            HostCall::StorageSet { store, key, value } => {
                self.storage.set(&store, key, value)?;
                Ok(HostReturn::Unit)
            }
            HostCall::StorageClear { store, key } => {
                self.storage.clear(&store, key)?;
                Ok(HostReturn::Unit)
            }
            HostCall::StorageAppend { key, item } => {
                self.storage.append(&StoreId::Top, key, &item)?;
                Ok(HostReturn::Unit)
            }
            HostCall::StorageClearPrefix {
                store,
                prefix,
                limit,
                cursor,
            } => {
                let outcome =
                    self.storage
                        .clear_prefix(&store, &prefix, limit, cursor.as_deref())?;
                storage_metrics().inc_keys_cleared(u64::from(outcome.deleted));
                Ok(HostReturn::ClearPrefix(outcome))
            }
            HostCall::StorageKillChild { child } => {
                let deleted = self.storage.kill_child(&child)?;
                storage_metrics().inc_keys_cleared(u64::from(deleted));
                Ok(HostReturn::Unit)
            }
            HostCall::StartTransaction => {
                self.storage.begin_transaction()?;
                Ok(HostReturn::Unit)
            }
            HostCall::CommitTransaction => {
                self.storage.commit_transaction()?;
                storage_metrics().inc_transactions("commit");
                Ok(HostReturn::Unit)
            }
            HostCall::RollbackTransaction => {
                self.storage.rollback_transaction()?;
                storage_metrics().inc_transactions("rollback");
                Ok(HostReturn::Unit)
            }
            HostCall::StorageRoot { store, version } => {
                let version = version.unwrap_or(self.config.state_version);
                Ok(HostReturn::Hash32(self.storage.root(&store, version)?))
            }
            HostCall::TrieOrderedRoot { items, version } => {
                Ok(HostReturn::Hash32(ordered_root(&items, version)?))
            }
            HostCall::StartBatchVerify => {
                self.session.start()?;
                Ok(HostReturn::Unit)
            }
            HostCall::FinishBatchVerify => {
                let passed = self.session.finish()?;
                host_metrics().inc_batch_verifications(passed);
                Ok(HostReturn::Bool(passed))
            }
            HostCall::Ed25519Verify {
                signature,
                message,
                public_key,
            } => Ok(HostReturn::Bool(eddsa::verify(
                &signature,
                &message,
                &public_key,
            ))),
            HostCall::Ed25519BatchVerify {
                signature,
                message,
                public_key,
            } => Ok(HostReturn::Bool(self.session.queue_ed25519(
                &signature,
                &message,
                &public_key,
            )?)),
            HostCall::Ed25519Generate { key_type, seed } => Ok(HostReturn::PublicKey(
                self.keystore.ed25519_generate(key_type, seed.as_deref())?,
            )),
            HostCall::Ed25519Sign {
                key_type,
                public_key,
                message,
            } => Ok(HostReturn::Signature(self.keystore.ed25519_sign(
                key_type,
                &public_key,
                &message,
            )?)),
            HostCall::Ed25519PublicKeys { key_type } => Ok(HostReturn::PublicKeys(
                self.keystore.ed25519_public_keys(key_type),
            )),
            HostCall::Hash { algorithm, data } => hash(algorithm, &data),
            HostCall::Log {
                level,
                target,
                message,
            } => {
                logging::forward_log(level, self.config.max_log_level, &target, &message);
                Ok(HostReturn::Unit)
            }
            HostCall::MaxLevel => Ok(HostReturn::LogLevel(self.config.max_log_level)),
            HostCall::PrintHex(data) => {
                logging::print_hex(&data);
                Ok(HostReturn::Unit)
            }
            HostCall::PrintUtf8(data) => {
                logging::print_utf8(&data);
                Ok(HostReturn::Unit)
            }
            HostCall::PrintNum(value) => {
                logging::print_num(value);
                Ok(HostReturn::Unit)
            }
            HostCall::RuntimeVersion { code } => {
                let version = self.versions.get(&sha256(&code)?);
                Ok(HostReturn::Bytes(version.map(to_bytes_canonical)))
            }
        }
    }
}

fn hash(algorithm: HashAlgorithm, data: &[u8]) -> Result<HostReturn, HostFault> {
    let out = digest(algorithm, data)?;
    let got = out.len();
    let shape = || HostFault::Backend(format!("{:?} produced {} bytes", algorithm, got));
    match algorithm.output_len() {
        32 => Ok(HostReturn::Hash32(out.try_into().map_err(|_| shape())?)),
        64 => Ok(HostReturn::Hash64(out.try_into().map_err(|_| shape())?)),
        _ => Err(shape()),
    }
}

impl HostDispatch for ExecutionContext {
    fn dispatch(&mut self, call: HostCall) -> Result<HostReturn, HostFault> {
        let name = call.name();
        host_metrics().inc_host_calls(name);
        let _timer = Timer::new(host_metrics(), name);

        let result = self.handle(call);
        if let Err(fault) = &result {
            error_metrics().inc_error("host", fault.code());
            tracing::warn!(
                target: "host",
                call = name,
                code = fault.code(),
                error = %fault,
                "host call faulted; context must be discarded"
            );
        }
        result
    }
}
