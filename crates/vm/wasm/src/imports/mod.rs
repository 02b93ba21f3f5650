// Path: crates/vm/wasm/src/imports/mod.rs
//! Wiring of every [`HostFunction`] into the `env` import module.
//!
//! Each import decodes its raw arguments into a [`HostCall`], dispatches it to
//! the store's [`ExecutionContext`] and encodes the [`HostReturn`] back into
//! guest memory. Any [`HostFault`] becomes a trap.

use crate::allocator::FreeingBumpHeapAllocator;
use crate::memory::{self, pack_ptr_len};
use sbx_api::error::{ErrorCode, HostFault};
use sbx_api::host::{HashAlgorithm, HostCall, HostDispatch, HostFunction, HostReturn};
use sbx_api::state::StoreId;
use sbx_host::ExecutionContext;
use sbx_telemetry::error_metrics;
use sbx_telemetry::sinks::ErrorMetricsSink;
use wasmtime::{Caller, Extern, Linker, Memory};

mod crypto;
mod misc;
mod storage;

/// The data a wasmtime store carries for one runtime call.
pub(crate) struct HostState {
    pub(crate) context: ExecutionContext,
    pub(crate) heap: FreeingBumpHeapAllocator,
}

type HostCaller<'a> = Caller<'a, HostState>;

fn trap(fault: HostFault) -> anyhow::Error {
    error_metrics().inc_error("wasm", fault.code());
    anyhow::Error::new(fault)
}

/// Registers `$body` under `$name`; the body yields `Result<_, HostFault>`.
macro_rules! wrap {
    ($linker:expr, $name:expr, |$caller:ident $(, $arg:ident : $ty:ty)*| $body:expr) => {
        $linker.func_wrap(
            "env",
            $name,
            move |mut caller: Caller<'_, HostState> $(, $arg: $ty)*| {
                let $caller = &mut caller;
                $body.map_err(trap)
            },
        )?
    };
}

/// Links every host function into `linker`.
pub(crate) fn link_all(linker: &mut Linker<HostState>) -> anyhow::Result<()> {
    for function in HostFunction::ALL {
        link(linker, *function)?;
    }
    Ok(())
}

fn link(linker: &mut Linker<HostState>, function: HostFunction) -> anyhow::Result<()> {
    use HostFunction as F;
    let name = function.name();
    match function {
        F::StorageGetV1 => wrap!(linker, name, |c, key: i64| storage::get(c, StoreId::Top, key)),
        F::StorageExistsV1 => {
            wrap!(linker, name, |c, key: i64| storage::exists(c, StoreId::Top, key))
        }
        F::StorageReadV1 => wrap!(linker, name, |c, key: i64, out: i64, offset: i32| {
            storage::read_into(c, key, out, offset)
        }),
        F::StorageNextKeyV1 => {
            wrap!(linker, name, |c, key: i64| storage::next_key(c, StoreId::Top, key))
        }
        F::StorageSetV1 => wrap!(linker, name, |c, key: i64, value: i64| {
            storage::set(c, StoreId::Top, key, value)
        }),
        F::StorageClearV1 => {
            wrap!(linker, name, |c, key: i64| storage::clear(c, StoreId::Top, key))
        }
        F::StorageAppendV1 => {
            wrap!(linker, name, |c, key: i64, item: i64| storage::append(c, key, item))
        }
        F::StorageClearPrefixV2 => {
            wrap!(linker, name, |c, prefix: i64, limit: i64, cursor: i64| {
                storage::clear_prefix(c, StoreId::Top, prefix, limit, cursor)
            })
        }
        F::StorageStartTransactionV1 => {
            wrap!(linker, name, |c| storage::transaction(c, HostCall::StartTransaction))
        }
        F::StorageCommitTransactionV1 => {
            wrap!(linker, name, |c| storage::transaction(c, HostCall::CommitTransaction))
        }
        F::StorageRollbackTransactionV1 => {
            wrap!(linker, name, |c| storage::transaction(c, HostCall::RollbackTransaction))
        }
        F::StorageRootV1 => wrap!(linker, name, |c| storage::root(c, StoreId::Top, None)),
        F::StorageRootV2 => wrap!(linker, name, |c, version: i32| {
            storage::root(c, StoreId::Top, Some(version))
        }),
        F::ChildStorageGetV1 => wrap!(linker, name, |c, child: i64, key: i64| {
            storage::child(c, child).and_then(|store| storage::get(c, store, key))
        }),
        F::ChildStorageSetV1 => wrap!(linker, name, |c, child: i64, key: i64, value: i64| {
            storage::child(c, child).and_then(|store| storage::set(c, store, key, value))
        }),
        F::ChildStorageClearV1 => wrap!(linker, name, |c, child: i64, key: i64| {
            storage::child(c, child).and_then(|store| storage::clear(c, store, key))
        }),
        F::ChildStorageExistsV1 => wrap!(linker, name, |c, child: i64, key: i64| {
            storage::child(c, child).and_then(|store| storage::exists(c, store, key))
        }),
        F::ChildStorageNextKeyV1 => wrap!(linker, name, |c, child: i64, key: i64| {
            storage::child(c, child).and_then(|store| storage::next_key(c, store, key))
        }),
        F::ChildStorageClearPrefixV2 => wrap!(
            linker,
            name,
            |c, child: i64, prefix: i64, limit: i64, cursor: i64| {
                storage::child(c, child)
                    .and_then(|store| storage::clear_prefix(c, store, prefix, limit, cursor))
            }
        ),
        F::ChildStorageKillV1 => wrap!(linker, name, |c, child: i64| storage::kill(c, child)),
        F::ChildStorageRootV2 => wrap!(linker, name, |c, child: i64, version: i32| {
            storage::child(c, child).and_then(|store| storage::root(c, store, Some(version)))
        }),
        F::TrieOrderedRootV1 => {
            wrap!(linker, name, |c, input: i64| storage::ordered_root(c, input, None))
        }
        F::TrieOrderedRootV2 => wrap!(linker, name, |c, input: i64, version: i32| {
            storage::ordered_root(c, input, Some(version))
        }),
        F::CryptoStartBatchVerifyV1 => wrap!(linker, name, |c| crypto::start_batch(c)),
        F::CryptoFinishBatchVerifyV1 => wrap!(linker, name, |c| crypto::finish_batch(c)),
        F::CryptoEd25519VerifyV1 => wrap!(linker, name, |c, sig: i32, msg: i64, pk: i32| {
            crypto::ed25519_verify(c, sig, msg, pk, false)
        }),
        F::CryptoEd25519BatchVerifyV1 => {
            wrap!(linker, name, |c, sig: i32, msg: i64, pk: i32| {
                crypto::ed25519_verify(c, sig, msg, pk, true)
            })
        }
        F::CryptoEd25519GenerateV1 => wrap!(linker, name, |c, key_type: i32, seed: i64| {
            crypto::ed25519_generate(c, key_type, seed)
        }),
        F::CryptoEd25519SignV1 => wrap!(linker, name, |c, key_type: i32, pk: i32, msg: i64| {
            crypto::ed25519_sign(c, key_type, pk, msg)
        }),
        F::CryptoEd25519PublicKeysV1 => {
            wrap!(linker, name, |c, key_type: i32| crypto::ed25519_public_keys(c, key_type))
        }
        F::HashingSha2_256V1 => {
            wrap!(linker, name, |c, data: i64| crypto::hash(c, HashAlgorithm::Sha2_256, data))
        }
        F::HashingSha2_512V1 => {
            wrap!(linker, name, |c, data: i64| crypto::hash(c, HashAlgorithm::Sha2_512, data))
        }
        F::HashingKeccak256V1 => {
            wrap!(linker, name, |c, data: i64| crypto::hash(c, HashAlgorithm::Keccak256, data))
        }
        F::HashingBlake2b512V1 => {
            wrap!(linker, name, |c, data: i64| crypto::hash(c, HashAlgorithm::Blake2b512, data))
        }
        F::HashingBlake2s256V1 => {
            wrap!(linker, name, |c, data: i64| crypto::hash(c, HashAlgorithm::Blake2s256, data))
        }
        F::LoggingLogV1 => wrap!(linker, name, |c, level: i32, target: i64, message: i64| {
            misc::log(c, level, target, message)
        }),
        F::LoggingMaxLevelV1 => wrap!(linker, name, |c| misc::max_level(c)),
        F::MiscPrintHexV1 => {
            wrap!(linker, name, |c, data: i64| misc::print(c, data, HostCall::PrintHex))
        }
        F::MiscPrintUtf8V1 => {
            wrap!(linker, name, |c, data: i64| misc::print(c, data, HostCall::PrintUtf8))
        }
        F::MiscPrintNumV1 => wrap!(linker, name, |c, value: i64| misc::print_num(c, value)),
        F::MiscRuntimeVersionV1 => {
            wrap!(linker, name, |c, code: i64| misc::runtime_version(c, code))
        }
        F::AllocatorMallocV1 => wrap!(linker, name, |c, size: i32| misc::malloc(c, size)),
        F::AllocatorFreeV1 => wrap!(linker, name, |c, ptr: i32| misc::free(c, ptr)),
    };
    Ok(())
}

// --- Bridge helpers shared by the import groups ---

fn linear_memory(caller: &mut HostCaller<'_>) -> Result<Memory, HostFault> {
    match caller.get_export("memory") {
        Some(Extern::Memory(memory)) => Ok(memory),
        _ => Err(HostFault::Memory("module exports no linear memory".into())),
    }
}

/// Copies out the buffer a packed argument designates.
fn read(caller: &mut HostCaller<'_>, packed: i64) -> Result<Vec<u8>, HostFault> {
    let memory = linear_memory(caller)?;
    memory::read_packed(memory.data(&*caller), packed as u64)
}

fn read_fixed<const N: usize>(caller: &mut HostCaller<'_>, ptr: i32) -> Result<[u8; N], HostFault> {
    let memory = linear_memory(caller)?;
    memory::read_array(memory.data(&*caller), ptr as u32)
}

fn write(caller: &mut HostCaller<'_>, ptr: u32, data: &[u8]) -> Result<(), HostFault> {
    let memory = linear_memory(caller)?;
    memory::write_bytes(memory.data_mut(&mut *caller), ptr, data)
}

/// Copies `data` into a fresh heap block and returns its address.
fn place(caller: &mut HostCaller<'_>, data: &[u8]) -> Result<u32, HostFault> {
    let memory = linear_memory(caller)?;
    let (bytes, state) = memory.data_and_store_mut(&mut *caller);
    let ptr = state.heap.allocate(bytes, data.len() as u32)?;
    if ptr == 0 {
        return Err(HostFault::Memory(format!(
            "guest heap has no room for a {}-byte result",
            data.len()
        )));
    }
    memory::write_bytes(bytes, ptr, data)?;
    Ok(ptr)
}

/// Like [`place`], returning the packed pointer/length word.
fn place_packed(caller: &mut HostCaller<'_>, data: &[u8]) -> Result<i64, HostFault> {
    let ptr = place(caller, data)?;
    Ok(pack_ptr_len(ptr, data.len() as u32) as i64)
}

fn dispatch(caller: &mut HostCaller<'_>, call: HostCall) -> Result<HostReturn, HostFault> {
    caller.data_mut().context.dispatch(call)
}

fn unexpected(ret: HostReturn) -> HostFault {
    HostFault::Backend(format!("unexpected return shape {:?}", ret))
}

fn into_unit(ret: HostReturn) -> Result<(), HostFault> {
    match ret {
        HostReturn::Unit => Ok(()),
        other => Err(unexpected(other)),
    }
}

fn into_bool(ret: HostReturn) -> Result<i32, HostFault> {
    match ret {
        HostReturn::Bool(value) => Ok(i32::from(value)),
        other => Err(unexpected(other)),
    }
}

fn into_bytes(ret: HostReturn) -> Result<Option<Vec<u8>>, HostFault> {
    match ret {
        HostReturn::Bytes(value) => Ok(value),
        other => Err(unexpected(other)),
    }
}
