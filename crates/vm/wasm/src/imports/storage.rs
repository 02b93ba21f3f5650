// Path: crates/vm/wasm/src/imports/storage.rs
//! `ext_storage_*`, `ext_default_child_storage_*` and `ext_trie_*`.

use super::{
    dispatch, into_bool, into_bytes, into_unit, place, place_packed, read, unexpected, write,
    HostCaller,
};
use crate::memory::unpack_ptr_len;
use sbx_api::error::HostFault;
use sbx_api::host::{HostCall, HostReturn};
use sbx_api::state::StoreId;
use sbx_types::codec::{from_bytes_canonical, to_bytes_canonical};
use sbx_types::state::StateVersion;

/// Resolves a packed child selector to its store.
pub(super) fn child(caller: &mut HostCaller<'_>, selector: i64) -> Result<StoreId, HostFault> {
    Ok(StoreId::Child(read(caller, selector)?))
}

fn state_version(raw: i32) -> Result<StateVersion, HostFault> {
    StateVersion::try_from(raw as u32).map_err(HostFault::DataShape)
}

pub(super) fn get(caller: &mut HostCaller<'_>, store: StoreId, key: i64) -> Result<i64, HostFault> {
    let key = read(caller, key)?;
    let value = into_bytes(dispatch(caller, HostCall::StorageGet { store, key })?)?;
    place_packed(caller, &to_bytes_canonical(&value))
}

pub(super) fn exists(
    caller: &mut HostCaller<'_>,
    store: StoreId,
    key: i64,
) -> Result<i32, HostFault> {
    let key = read(caller, key)?;
    into_bool(dispatch(caller, HostCall::StorageExists { store, key })?)
}

/// Copies the value from `offset` into the caller's buffer, as much as fits.
///
/// Returns a packed SCALE `Option<u32>` holding the number of bytes the value
/// has past `offset`, or `None` when the key is absent.
pub(super) fn read_into(
    caller: &mut HostCaller<'_>,
    key: i64,
    out: i64,
    offset: i32,
) -> Result<i64, HostFault> {
    let key = read(caller, key)?;
    let remaining = into_bytes(dispatch(
        caller,
        HostCall::StorageRead {
            store: StoreId::Top,
            key,
            offset: offset as u32,
        },
    )?)?;
    let written = match &remaining {
        Some(bytes) => {
            let (ptr, capacity) = unpack_ptr_len(out as u64);
            let fits = bytes.get(..capacity as usize).unwrap_or(bytes.as_slice());
            write(caller, ptr, fits)?;
            Some(bytes.len() as u32)
        }
        None => None,
    };
    place_packed(caller, &to_bytes_canonical(&written))
}

pub(super) fn next_key(
    caller: &mut HostCaller<'_>,
    store: StoreId,
    key: i64,
) -> Result<i64, HostFault> {
    let key = read(caller, key)?;
    let next = into_bytes(dispatch(caller, HostCall::StorageNextKey { store, key })?)?;
    place_packed(caller, &to_bytes_canonical(&next))
}

pub(super) fn set(
    caller: &mut HostCaller<'_>,
    store: StoreId,
    key: i64,
    value: i64,
) -> Result<(), HostFault> {
    let key = read(caller, key)?;
    let value = read(caller, value)?;
    into_unit(dispatch(caller, HostCall::StorageSet { store, key, value })?)
}

pub(super) fn clear(caller: &mut HostCaller<'_>, store: StoreId, key: i64) -> Result<(), HostFault> {
    let key = read(caller, key)?;
    into_unit(dispatch(caller, HostCall::StorageClear { store, key })?)
}

pub(super) fn append(caller: &mut HostCaller<'_>, key: i64, item: i64) -> Result<(), HostFault> {
    let key = read(caller, key)?;
    let item = read(caller, item)?;
    into_unit(dispatch(caller, HostCall::StorageAppend { key, item })?)
}

/// `limit` designates a SCALE `Option<u32>`, `cursor` a SCALE `Option<Vec<u8>>`.
pub(super) fn clear_prefix(
    caller: &mut HostCaller<'_>,
    store: StoreId,
    prefix: i64,
    limit: i64,
    cursor: i64,
) -> Result<i64, HostFault> {
    let prefix = read(caller, prefix)?;
    let limit: Option<u32> =
        from_bytes_canonical(&read(caller, limit)?).map_err(HostFault::DataShape)?;
    let cursor: Option<Vec<u8>> =
        from_bytes_canonical(&read(caller, cursor)?).map_err(HostFault::DataShape)?;
    let call = HostCall::StorageClearPrefix {
        store,
        prefix,
        limit,
        cursor,
    };
    match dispatch(caller, call)? {
        HostReturn::ClearPrefix(outcome) => place_packed(caller, &to_bytes_canonical(&outcome)),
        other => Err(unexpected(other)),
    }
}

pub(super) fn kill(caller: &mut HostCaller<'_>, selector: i64) -> Result<(), HostFault> {
    let child = read(caller, selector)?;
    into_unit(dispatch(caller, HostCall::StorageKillChild { child })?)
}

pub(super) fn transaction(caller: &mut HostCaller<'_>, call: HostCall) -> Result<(), HostFault> {
    into_unit(dispatch(caller, call)?)
}

fn place_root(caller: &mut HostCaller<'_>, ret: HostReturn) -> Result<i32, HostFault> {
    match ret {
        HostReturn::Hash32(root) => Ok(place(caller, &root)? as i32),
        other => Err(unexpected(other)),
    }
}

/// Writes the 32-byte root into a fresh block and returns its address.
pub(super) fn root(
    caller: &mut HostCaller<'_>,
    store: StoreId,
    raw_version: Option<i32>,
) -> Result<i32, HostFault> {
    let version = raw_version.map(state_version).transpose()?;
    let ret = dispatch(caller, HostCall::StorageRoot { store, version })?;
    place_root(caller, ret)
}

/// `input` designates a SCALE `Vec<Vec<u8>>`; version 1 uses [`StateVersion::V0`].
pub(super) fn ordered_root(
    caller: &mut HostCaller<'_>,
    input: i64,
    raw_version: Option<i32>,
) -> Result<i32, HostFault> {
    let items: Vec<Vec<u8>> =
        from_bytes_canonical(&read(caller, input)?).map_err(HostFault::DataShape)?;
    let version = raw_version.map(state_version).transpose()?.unwrap_or_default();
    let ret = dispatch(caller, HostCall::TrieOrderedRoot { items, version })?;
    place_root(caller, ret)
}
