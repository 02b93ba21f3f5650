// Path: crates/vm/wasm/src/imports/crypto.rs
//! `ext_crypto_*` and `ext_hashing_*`.

use super::{
    dispatch, into_bool, into_unit, place, place_packed, read, read_fixed, unexpected, HostCaller,
};
use sbx_api::error::HostFault;
use sbx_api::host::{HashAlgorithm, HostCall, HostReturn};
use sbx_types::app::KeyTypeId;
use sbx_types::codec::{from_bytes_canonical, to_bytes_canonical};

pub(super) fn start_batch(caller: &mut HostCaller<'_>) -> Result<(), HostFault> {
    into_unit(dispatch(caller, HostCall::StartBatchVerify)?)
}

pub(super) fn finish_batch(caller: &mut HostCaller<'_>) -> Result<i32, HostFault> {
    into_bool(dispatch(caller, HostCall::FinishBatchVerify)?)
}

/// `sig` addresses 64 bytes, `pk` 32 bytes. With `batched` the check is
/// queued into the open session instead of run immediately.
pub(super) fn ed25519_verify(
    caller: &mut HostCaller<'_>,
    sig: i32,
    msg: i64,
    pk: i32,
    batched: bool,
) -> Result<i32, HostFault> {
    let signature = read_fixed::<64>(caller, sig)?.to_vec();
    let message = read(caller, msg)?;
    let public_key = read_fixed::<32>(caller, pk)?.to_vec();
    let call = if batched {
        HostCall::Ed25519BatchVerify {
            signature,
            message,
            public_key,
        }
    } else {
        HostCall::Ed25519Verify {
            signature,
            message,
            public_key,
        }
    };
    into_bool(dispatch(caller, call)?)
}

/// `seed` designates a SCALE `Option<Vec<u8>>`; returns the address of the 32-byte key.
pub(super) fn ed25519_generate(
    caller: &mut HostCaller<'_>,
    key_type: i32,
    seed: i64,
) -> Result<i32, HostFault> {
    let seed: Option<Vec<u8>> =
        from_bytes_canonical(&read(caller, seed)?).map_err(HostFault::DataShape)?;
    let call = HostCall::Ed25519Generate {
        key_type: KeyTypeId::from_u32_le(key_type as u32),
        seed,
    };
    match dispatch(caller, call)? {
        HostReturn::PublicKey(public) => Ok(place(caller, &public)? as i32),
        other => Err(unexpected(other)),
    }
}

/// Returns a packed SCALE `Option<[u8; 64]>`.
pub(super) fn ed25519_sign(
    caller: &mut HostCaller<'_>,
    key_type: i32,
    pk: i32,
    msg: i64,
) -> Result<i64, HostFault> {
    let public_key = read_fixed::<32>(caller, pk)?;
    let message = read(caller, msg)?;
    let call = HostCall::Ed25519Sign {
        key_type: KeyTypeId::from_u32_le(key_type as u32),
        public_key,
        message,
    };
    match dispatch(caller, call)? {
        HostReturn::Signature(signature) => place_packed(caller, &to_bytes_canonical(&signature)),
        other => Err(unexpected(other)),
    }
}

/// Returns a packed SCALE `Vec<[u8; 32]>`.
pub(super) fn ed25519_public_keys(
    caller: &mut HostCaller<'_>,
    key_type: i32,
) -> Result<i64, HostFault> {
    let call = HostCall::Ed25519PublicKeys {
        key_type: KeyTypeId::from_u32_le(key_type as u32),
    };
    match dispatch(caller, call)? {
        HostReturn::PublicKeys(keys) => place_packed(caller, &to_bytes_canonical(&keys)),
        other => Err(unexpected(other)),
    }
}

/// Writes the digest into a fresh block and returns its address.
pub(super) fn hash(
    caller: &mut HostCaller<'_>,
    algorithm: HashAlgorithm,
    data: i64,
) -> Result<i32, HostFault> {
    let data = read(caller, data)?;
    match dispatch(caller, HostCall::Hash { algorithm, data })? {
        HostReturn::Hash32(digest) => Ok(place(caller, &digest)? as i32),
        HostReturn::Hash64(digest) => Ok(place(caller, &digest)? as i32),
        other => Err(unexpected(other)),
    }
}
