// Path: crates/vm/wasm/src/runtime.rs
//! The wasmtime engine, its linker and the per-call store lifecycle.

use crate::allocator::FreeingBumpHeapAllocator;
use crate::imports::{link_all, HostState};
use crate::memory::{read_packed, unpack_ptr_len, write_bytes};
use sbx_api::error::{ErrorCode, HostFault, VmError};
use sbx_crypto::algorithms::hash::sha256;
use sbx_host::ExecutionContext;
use sbx_telemetry::sinks::{ErrorMetricsSink, HostMetricsSink};
use sbx_telemetry::{error_metrics, host_metrics};
use sbx_types::config::HostConfig;
use std::collections::HashMap;
use std::sync::RwLock;
use wasmtime::{Config, Engine, Linker, Module, Store, Trap, Val};

/// Bytes in one wasm page.
const PAGE_SIZE: u64 = 64 * 1024;

/// The result of a runtime call that returned normally.
pub struct CallOutcome {
    /// The bytes the entry point returned.
    pub output: Vec<u8>,
    /// Fuel consumed by the call.
    pub fuel_used: u64,
    /// The context, carrying whatever the call committed.
    pub context: ExecutionContext,
}

/// Hosts runtime modules against the sandbox host functions.
///
/// Entry points have the signature `(ptr: i32, len: i32) -> i64`: the input is
/// placed in guest memory by the host allocator and the packed result word
/// designates the output. Compiled modules are cached by the SHA-256 of their
/// code.
pub struct WasmRuntime {
    engine: Engine,
    linker: Linker<HostState>,
    config: HostConfig,
    module_cache: RwLock<HashMap<[u8; 32], Module>>,
}

impl WasmRuntime {
    pub fn new(config: HostConfig) -> Result<Self, VmError> {
        let mut engine_config = Config::new();
        engine_config.consume_fuel(true);
        let engine =
            Engine::new(&engine_config).map_err(|e| VmError::Initialization(e.to_string()))?;

        let mut linker = Linker::new(&engine);
        link_all(&mut linker).map_err(|e| VmError::Initialization(e.to_string()))?;

        Ok(Self {
            engine,
            linker,
            config,
            module_cache: RwLock::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    fn module(&self, code: &[u8]) -> Result<Module, VmError> {
        let code_hash = sha256(code)
            .map_err(|e| VmError::Initialization(format!("Hashing failed: {}", e)))?;

        if let Some(module) = self.module_cache.read().map_err(poisoned)?.get(&code_hash) {
            return Ok(module.clone());
        }
        let module =
            Module::new(&self.engine, code).map_err(|e| VmError::InvalidBytecode(e.to_string()))?;
        self.module_cache
            .write()
            .map_err(poisoned)?
            .insert(code_hash, module.clone());
        Ok(module)
    }

    /// Runs `entry` of the module `code` with `input` against `context`.
    ///
    /// The context comes back only when the call returns normally. A trap,
    /// including one raised by a faulting host call or by fuel exhaustion,
    /// discards it together with everything it staged.
    pub fn call(
        &self,
        code: &[u8],
        entry: &str,
        input: &[u8],
        context: ExecutionContext,
    ) -> Result<CallOutcome, VmError> {
        let result = self.call_inner(code, entry, input, context);
        if let Err(e) = &result {
            error_metrics().inc_error("vm", e.code());
            tracing::warn!(target: "wasm", entry, code = e.code(), error = %e, "runtime call failed");
        }
        result
    }

    fn call_inner(
        &self,
        code: &[u8],
        entry: &str,
        input: &[u8],
        context: ExecutionContext,
    ) -> Result<CallOutcome, VmError> {
        let module = self.module(code)?;
        let state = HostState {
            context,
            heap: FreeingBumpHeapAllocator::new(0),
        };
        let mut store = Store::new(&self.engine, state);
        let fuel = self.config.fuel_limit;
        store
            .set_fuel(fuel)
            .map_err(|e| VmError::Initialization(e.to_string()))?;

        let instance = self
            .linker
            .instantiate(&mut store, &module)
            .map_err(|e| VmError::Initialization(e.to_string()))?;
        let memory = instance
            .get_memory(&mut store, "memory")
            .ok_or_else(|| VmError::MemoryError("module exports no linear memory".into()))?;
        let heap_base = match instance
            .get_global(&mut store, "__heap_base")
            .map(|global| global.get(&mut store))
        {
            Some(Val::I32(base)) => base as u32,
            _ => {
                return Err(VmError::Initialization(
                    "module exports no i32 __heap_base".into(),
                ))
            }
        };

        let pages = memory.size(&store);
        let wanted = u64::from(self.config.heap_pages);
        if pages < wanted {
            memory
                .grow(&mut store, wanted - pages)
                .map_err(|e| VmError::MemoryError(format!("growing to {} pages: {}", wanted, e)))?;
        }
        store.data_mut().heap = FreeingBumpHeapAllocator::new(heap_base);
        tracing::debug!(
            target: "wasm",
            entry,
            heap_base,
            memory_bytes = memory.size(&store) * PAGE_SIZE,
            "instantiated runtime module"
        );

        let (bytes, state) = memory.data_and_store_mut(&mut store);
        let input_ptr = state.heap.allocate(bytes, input.len() as u32).map_err(host_error)?;
        if input_ptr == 0 {
            return Err(VmError::MemoryError(format!(
                "no room for a {}-byte input",
                input.len()
            )));
        }
        write_bytes(bytes, input_ptr, input).map_err(host_error)?;

        let func = instance
            .get_typed_func::<(i32, i32), i64>(&mut store, entry)
            .map_err(|e| VmError::FunctionNotFound(format!("{}: {}", entry, e)))?;
        let packed = match func.call(&mut store, (input_ptr as i32, input.len() as i32)) {
            Ok(packed) => packed as u64,
            Err(err) => {
                host_metrics().inc_runtime_traps(entry);
                return Err(classify_trap(err, fuel));
            }
        };

        let output = read_packed(memory.data(&store), packed).map_err(host_error)?;
        let fuel_used = fuel.saturating_sub(store.get_fuel().unwrap_or(0));
        tracing::debug!(
            target: "wasm",
            entry,
            fuel_used,
            output = %PackedWord(packed),
            "runtime call returned"
        );

        let HostState { context, .. } = store.into_data();
        Ok(CallOutcome {
            output,
            fuel_used,
            context,
        })
    }
}

fn poisoned<T>(_: T) -> VmError {
    VmError::Initialization("module cache lock poisoned".into())
}

fn host_error(fault: HostFault) -> VmError {
    VmError::HostError(format!("{} ({})", fault, fault.code()))
}

fn classify_trap(err: anyhow::Error, fuel: u64) -> VmError {
    if let Some(Trap::OutOfFuel) = err.downcast_ref::<Trap>() {
        return VmError::OutOfFuel(fuel);
    }
    if let Some(fault) = err.downcast_ref::<HostFault>() {
        return host_error(fault.clone());
    }
    VmError::ExecutionTrap(format!("{:#}", err))
}

struct PackedWord(u64);

impl std::fmt::Display for PackedWord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (ptr, len) = unpack_ptr_len(self.0);
        write!(f, "{:#x}+{}", ptr, len)
    }
}

impl std::fmt::Debug for CallOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallOutcome")
            .field("output_len", &self.output.len())
            .field("fuel_used", &self.fuel_used)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for WasmRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WasmRuntime")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
