// Path: crates/host/src/context/tests/mod.rs

use super::*;
use parity_scale_codec::Decode;
use sbx_api::state::ClearPrefixOutcome;
use sbx_state::backend::InMemoryBackend;
use sbx_test_utils::{assert_err, assert_ok};
use sbx_types::app::KeyTypeId;
use sbx_types::config::LogLevel;
use sbx_types::state::StateVersion;

const ACCO: KeyTypeId = KeyTypeId(*b"acco");

fn context() -> ExecutionContext {
    ExecutionContext::new(Arc::new(InMemoryBackend::new()), HostConfig::default())
}

fn set(key: &[u8], value: &[u8]) -> HostCall {
    HostCall::StorageSet {
        store: StoreId::Top,
        key: key.to_vec(),
        value: value.to_vec(),
    }
}

fn get(key: &[u8]) -> HostCall {
    HostCall::StorageGet {
        store: StoreId::Top,
        key: key.to_vec(),
    }
}

fn signed(ctx: &mut ExecutionContext, seed: &[u8], message: &[u8]) -> ([u8; 32], [u8; 64]) {
    let public = ctx.keystore_mut().ed25519_generate(ACCO, Some(seed)).unwrap();
    let signature = ctx
        .keystore_mut()
        .ed25519_sign(ACCO, &public, message)
        .unwrap()
        .unwrap();
    (public, signature)
}

#[test]
fn nested_transactions_through_dispatch() {
    let mut ctx = context();
    ctx.dispatch(HostCall::StartTransaction).unwrap();
    ctx.dispatch(set(b"a", b"1")).unwrap();
    ctx.dispatch(HostCall::StartTransaction).unwrap();
    ctx.dispatch(set(b"a", b"2")).unwrap();
    ctx.dispatch(HostCall::RollbackTransaction).unwrap();
    ctx.dispatch(HostCall::CommitTransaction).unwrap();

    assert_eq!(
        ctx.dispatch(get(b"a")),
        Ok(HostReturn::Bytes(Some(b"1".to_vec())))
    );
}

#[test]
fn misuse_faults_as_contract_violation() {
    let mut ctx = context();
    assert!(matches!(
        ctx.dispatch(HostCall::CommitTransaction),
        Err(HostFault::ContractViolation(_))
    ));
    assert!(matches!(
        ctx.dispatch(HostCall::FinishBatchVerify),
        Err(HostFault::ContractViolation(_))
    ));
    ctx.dispatch(HostCall::StartBatchVerify).unwrap();
    assert!(matches!(
        ctx.dispatch(HostCall::StartBatchVerify),
        Err(HostFault::ContractViolation(_))
    ));
}

#[test]
fn child_root_keys_are_off_limits_to_the_runtime() {
    let mut ctx = context();
    let forged = set(b":child_storage:default:kid", b"root");
    assert!(matches!(
        ctx.dispatch(forged),
        Err(HostFault::ContractViolation(_))
    ));
}

#[test]
fn batch_session_over_dispatch() {
    let mut ctx = context();
    let (pk_a, sig_a) = signed(&mut ctx, b"//a", b"one");
    let (pk_b, sig_b) = signed(&mut ctx, b"//b", b"two");
    let queue = |sig: [u8; 64], msg: &[u8], pk: [u8; 32]| HostCall::Ed25519BatchVerify {
        signature: sig.to_vec(),
        message: msg.to_vec(),
        public_key: pk.to_vec(),
    };

    ctx.dispatch(HostCall::StartBatchVerify).unwrap();
    assert_eq!(ctx.dispatch(queue(sig_a, b"one", pk_a)), Ok(HostReturn::Bool(true)));
    assert_eq!(ctx.dispatch(queue(sig_b, b"two", pk_b)), Ok(HostReturn::Bool(true)));
    assert_eq!(ctx.dispatch(HostCall::FinishBatchVerify), Ok(HostReturn::Bool(true)));

    ctx.dispatch(HostCall::StartBatchVerify).unwrap();
    ctx.dispatch(queue(sig_a, b"one", pk_a)).unwrap();
    ctx.dispatch(queue(sig_b, b"not two", pk_b)).unwrap();
    assert_eq!(ctx.dispatch(HostCall::FinishBatchVerify), Ok(HostReturn::Bool(false)));

    assert_err!(ctx.dispatch(HostCall::FinishBatchVerify));
}

#[test]
fn immediate_verify_is_a_plain_boolean() {
    let mut ctx = context();
    let (pk, sig) = signed(&mut ctx, b"//v", b"msg");
    let verify = |msg: &[u8]| HostCall::Ed25519Verify {
        signature: sig.to_vec(),
        message: msg.to_vec(),
        public_key: pk.to_vec(),
    };
    assert_eq!(ctx.dispatch(verify(b"msg")), Ok(HostReturn::Bool(true)));
    assert_eq!(ctx.dispatch(verify(b"other")), Ok(HostReturn::Bool(false)));
    // No session is needed for the immediate form.
    assert_eq!(
        ctx.dispatch(HostCall::Ed25519Verify {
            signature: vec![0; 3],
            message: b"msg".to_vec(),
            public_key: pk.to_vec(),
        }),
        Ok(HostReturn::Bool(false))
    );
}

#[test]
fn append_onto_foreign_value_is_a_data_shape_fault() {
    let mut ctx = context();
    ctx.dispatch(set(b"k", b"")).unwrap();
    let fault = assert_err!(ctx.dispatch(HostCall::StorageAppend {
        key: b"k".to_vec(),
        item: vec![1],
    }));
    assert!(matches!(fault, HostFault::DataShape(_)));
}

#[test]
fn clear_prefix_returns_packed_outcome() {
    let mut ctx = context();
    for key in [b"p1", b"p2", b"p3"] {
        ctx.dispatch(set(key, b"x")).unwrap();
    }
    let out = ctx
        .dispatch(HostCall::StorageClearPrefix {
            store: StoreId::Top,
            prefix: b"p".to_vec(),
            limit: Some(2),
            cursor: None,
        })
        .unwrap();
    assert_eq!(
        out,
        HostReturn::ClearPrefix(ClearPrefixOutcome {
            deleted: 2,
            cursor: Some(b"p3".to_vec()),
        })
    );
    let bad_cursor = ctx.dispatch(HostCall::StorageClearPrefix {
        store: StoreId::Top,
        prefix: b"p".to_vec(),
        limit: None,
        cursor: Some(b"zz".to_vec()),
    });
    assert!(matches!(bad_cursor, Err(HostFault::ContractViolation(_))));
}

#[test]
fn roots_and_digests_have_fixed_widths() {
    let mut ctx = context();
    ctx.dispatch(set(b"k", b"v")).unwrap();
    let root = ctx
        .dispatch(HostCall::StorageRoot {
            store: StoreId::Top,
            version: None,
        })
        .unwrap();
    assert_eq!(
        root,
        HostReturn::Hash32(ctx.storage().root(&StoreId::Top, StateVersion::V0).unwrap())
    );

    let ordered = ctx
        .dispatch(HostCall::TrieOrderedRoot {
            items: vec![b"x".to_vec(), b"y".to_vec()],
            version: StateVersion::V1,
        })
        .unwrap();
    assert!(matches!(ordered, HostReturn::Hash32(_)));

    for (algorithm, wide) in [
        (HashAlgorithm::Sha2_256, false),
        (HashAlgorithm::Keccak256, false),
        (HashAlgorithm::Blake2s256, false),
        (HashAlgorithm::Sha2_512, true),
        (HashAlgorithm::Blake2b512, true),
    ] {
        let out = ctx
            .dispatch(HostCall::Hash {
                algorithm,
                data: b"abc".to_vec(),
            })
            .unwrap();
        match out {
            HostReturn::Hash32(_) => assert!(!wide, "{algorithm:?}"),
            HostReturn::Hash64(_) => assert!(wide, "{algorithm:?}"),
            other => panic!("unexpected return {other:?}"),
        }
    }
}

#[test]
fn logging_reports_configured_level() {
    let config = HostConfig {
        max_log_level: LogLevel::Warn,
        ..HostConfig::default()
    };
    let mut ctx = ExecutionContext::new(Arc::new(InMemoryBackend::new()), config);
    assert_eq!(
        ctx.dispatch(HostCall::MaxLevel),
        Ok(HostReturn::LogLevel(LogLevel::Warn))
    );
    assert_ok!(ctx.dispatch(HostCall::Log {
        level: LogLevel::Debug,
        target: b"pallet".to_vec(),
        message: b"dropped".to_vec(),
    }));
    assert_ok!(ctx.dispatch(HostCall::PrintUtf8(b"hello".to_vec())));
    assert_ok!(ctx.dispatch(HostCall::PrintHex(vec![0xde, 0xad])));
    assert_ok!(ctx.dispatch(HostCall::PrintNum(42)));
}

#[test]
fn runtime_version_is_looked_up_by_code_hash() {
    let mut ctx = context();
    let version = RuntimeVersion {
        spec_name: "sandbox".into(),
        impl_name: "sandbox-node".into(),
        authoring_version: 1,
        spec_version: 100,
        impl_version: 1,
        apis: vec![(*b"core_api", 4)],
        transaction_version: 1,
        state_version: 1,
    };
    ctx.register_runtime_version(b"code", version.clone()).unwrap();

    let HostReturn::Bytes(Some(encoded)) = ctx
        .dispatch(HostCall::RuntimeVersion {
            code: b"code".to_vec(),
        })
        .unwrap()
    else {
        panic!("expected an encoded version");
    };
    assert_eq!(RuntimeVersion::decode(&mut &encoded[..]).unwrap(), version);
    assert_eq!(
        ctx.dispatch(HostCall::RuntimeVersion {
            code: b"other".to_vec(),
        }),
        Ok(HostReturn::Bytes(None))
    );
}

#[test]
fn change_set_is_refused_while_a_transaction_is_open() {
    let mut ctx = context();
    ctx.dispatch(set(b"k", b"v")).unwrap();
    ctx.dispatch(HostCall::StartTransaction).unwrap();
    assert!(matches!(
        ctx.into_change_set(),
        Err(HostFault::ContractViolation(_))
    ));

    let mut ctx = context();
    ctx.dispatch(set(b"k", b"v")).unwrap();
    ctx.dispatch(HostCall::StartBatchVerify).unwrap();
    let changes = ctx.into_change_set().unwrap();
    assert_eq!(changes.top.0, vec![(b"k".to_vec(), b"v".to_vec())]);
}

#[test]
fn keystore_calls_round_trip() {
    let mut ctx = context();
    let HostReturn::PublicKey(pk) = ctx
        .dispatch(HostCall::Ed25519Generate {
            key_type: ACCO,
            seed: Some(b"//Alice".to_vec()),
        })
        .unwrap()
    else {
        panic!("expected a public key");
    };
    assert_eq!(
        ctx.dispatch(HostCall::Ed25519PublicKeys { key_type: ACCO }),
        Ok(HostReturn::PublicKeys(vec![pk]))
    );
    let HostReturn::Signature(Some(sig)) = ctx
        .dispatch(HostCall::Ed25519Sign {
            key_type: ACCO,
            public_key: pk,
            message: b"m".to_vec(),
        })
        .unwrap()
    else {
        panic!("expected a signature");
    };
    assert!(eddsa::verify(&sig, b"m", &pk));
}
