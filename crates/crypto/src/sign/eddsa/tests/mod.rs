// Path: crates/crypto/src/sign/eddsa/tests/mod.rs
use super::*;

#[test]
fn test_keypair_generation() {
    let keypair = Ed25519KeyPair::generate().unwrap();
    let message = b"Test message";

    let signature = keypair.sign(message).unwrap();

    let public_key = keypair.public_key();
    assert!(public_key.verify(message, &signature).is_ok());
}

#[test]
fn test_seeded_keys_are_deterministic() {
    let a = Ed25519KeyPair::from_seed(&[7u8; 32]).unwrap();
    let b = Ed25519KeyPair::from_seed(&[7u8; 32]).unwrap();
    let c = Ed25519KeyPair::from_seed(&[8u8; 32]).unwrap();

    assert_eq!(a.public_key_bytes(), b.public_key_bytes());
    assert_ne!(a.public_key_bytes(), c.public_key_bytes());

    // Ed25519 signing is deterministic for a fixed key and message.
    let sig_a = a.sign(b"m").unwrap();
    let sig_b = b.sign(b"m").unwrap();
    assert_eq!(sig_a.to_bytes(), sig_b.to_bytes());
}

#[test]
fn test_private_key_roundtrip_derives_same_public_key() {
    let keypair = Ed25519KeyPair::generate().unwrap();
    let private_bytes = keypair.private_key().to_bytes();
    assert_eq!(private_bytes.len(), 32);

    let private_key = Ed25519PrivateKey::from_bytes(&private_bytes).unwrap();
    let rebuilt = Ed25519KeyPair::from_private_key(&private_key).unwrap();
    assert_eq!(rebuilt.public_key_bytes(), keypair.public_key_bytes());
}

#[test]
fn test_wrong_signature_fails() {
    let keypair1 = Ed25519KeyPair::generate().unwrap();
    let keypair2 = Ed25519KeyPair::generate().unwrap();
    let message = b"Test message";

    let signature = keypair1.sign(message).unwrap();
    assert!(keypair2.public_key().verify(message, &signature).is_err());

    let sig_bytes = signature.to_bytes();
    assert!(verify(&sig_bytes, message, &keypair1.public_key_bytes()));
    assert!(!verify(&sig_bytes, message, &keypair2.public_key_bytes()));
    assert!(!verify(&sig_bytes, b"Other message", &keypair1.public_key_bytes()));
}

#[test]
fn test_malformed_material_is_rejected_structurally() {
    let keypair = Ed25519KeyPair::generate().unwrap();
    let sig = keypair.sign(b"m").unwrap().to_bytes();
    let pk = keypair.public_key_bytes();

    assert!(is_well_formed(&sig, &pk));
    assert!(!is_well_formed(&sig[..63], &pk));
    assert!(!is_well_formed(&sig, &pk[..31]));
    assert!(!verify(&sig[..10], b"m", &pk));
    assert!(matches!(
        Ed25519Signature::from_bytes(&[0u8; 12]),
        Err(CryptoError::InvalidSignature(_))
    ));
}
