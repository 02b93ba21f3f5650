// Path: crates/vm/wasm/src/imports/misc.rs
//! `ext_logging_*`, `ext_misc_*` and `ext_allocator_*`.

use super::{
    dispatch, into_bytes, into_unit, linear_memory, place_packed, read, unexpected, HostCaller,
};
use sbx_api::error::HostFault;
use sbx_api::host::{HostCall, HostReturn};
use sbx_types::codec::to_bytes_canonical;
use sbx_types::config::LogLevel;

pub(super) fn log(
    caller: &mut HostCaller<'_>,
    level: i32,
    target: i64,
    message: i64,
) -> Result<(), HostFault> {
    let level = LogLevel::from_wire(level as u32)
        .ok_or_else(|| HostFault::DataShape(format!("unknown log level {}", level)))?;
    let target = read(caller, target)?;
    let message = read(caller, message)?;
    into_unit(dispatch(
        caller,
        HostCall::Log {
            level,
            target,
            message,
        },
    )?)
}

pub(super) fn max_level(caller: &mut HostCaller<'_>) -> Result<i32, HostFault> {
    match dispatch(caller, HostCall::MaxLevel)? {
        HostReturn::LogLevel(level) => Ok(level.to_wire() as i32),
        other => Err(unexpected(other)),
    }
}

/// `print_hex` and `print_utf8`, which differ only in the call they build.
pub(super) fn print(
    caller: &mut HostCaller<'_>,
    data: i64,
    call: fn(Vec<u8>) -> HostCall,
) -> Result<(), HostFault> {
    let data = read(caller, data)?;
    into_unit(dispatch(caller, call(data))?)
}

pub(super) fn print_num(caller: &mut HostCaller<'_>, value: i64) -> Result<(), HostFault> {
    into_unit(dispatch(caller, HostCall::PrintNum(value as u64))?)
}

/// Returns a packed SCALE `Option<Vec<u8>>` holding the encoded version.
pub(super) fn runtime_version(caller: &mut HostCaller<'_>, code: i64) -> Result<i64, HostFault> {
    let code = read(caller, code)?;
    let version = into_bytes(dispatch(caller, HostCall::RuntimeVersion { code })?)?;
    place_packed(caller, &to_bytes_canonical(&version))
}

/// Guest-side allocation. Exhaustion is reported as a null pointer.
pub(super) fn malloc(caller: &mut HostCaller<'_>, size: i32) -> Result<i32, HostFault> {
    let memory = linear_memory(caller)?;
    let (bytes, state) = memory.data_and_store_mut(&mut *caller);
    Ok(state.heap.allocate(bytes, size as u32)? as i32)
}

pub(super) fn free(caller: &mut HostCaller<'_>, ptr: i32) -> Result<(), HostFault> {
    let memory = linear_memory(caller)?;
    let (bytes, state) = memory.data_and_store_mut(&mut *caller);
    state.heap.deallocate(bytes, ptr as u32)
}
