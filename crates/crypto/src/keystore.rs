// Path: crates/crypto/src/keystore.rs
//! In-memory Ed25519 keystore backing the `crypto.ed25519_*` key-management calls.
//!
//! Keys are partitioned by a four-byte [`KeyTypeId`]. Seeds are never returned
//! to the runtime module; only public keys and signatures cross the boundary.

use crate::algorithms::hash::sha256;
use crate::error::CryptoError;
use crate::sign::eddsa::{Ed25519KeyPair, SIGNATURE_LEN};
use sbx_api::crypto::{SerializableKey, SigningKeyPair};
use sbx_types::app::KeyTypeId;
use std::collections::{BTreeMap, HashMap};
use zeroize::Zeroizing;

/// A keystore holding Ed25519 key pairs per key type.
#[derive(Default)]
pub struct Keystore {
    ed25519: HashMap<KeyTypeId, BTreeMap<[u8; 32], Ed25519KeyPair>>,
}

impl Keystore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates and stores a key pair, returning its public key.
    ///
    /// With a seed, the secret seed is `sha256(seed)`, so the same phrase always
    /// yields the same key. Without one, the key is drawn from the OS RNG.
    pub fn ed25519_generate(
        &mut self,
        key_type: KeyTypeId,
        seed: Option<&[u8]>,
    ) -> Result<[u8; 32], CryptoError> {
        let pair = match seed {
            Some(phrase) => {
                let secret = Zeroizing::new(sha256(phrase)?);
                Ed25519KeyPair::from_seed(&secret)?
            }
            None => Ed25519KeyPair::generate()?,
        };
        let public = pair.public_key_bytes();
        self.ed25519.entry(key_type).or_default().insert(public, pair);
        log::debug!("generated ed25519 key for key type {}", key_type);
        Ok(public)
    }

    /// Signs `message` with the key identified by `public`, if the keystore has it.
    pub fn ed25519_sign(
        &self,
        key_type: KeyTypeId,
        public: &[u8; 32],
        message: &[u8],
    ) -> Result<Option<[u8; 64]>, CryptoError> {
        let Some(pair) = self.ed25519.get(&key_type).and_then(|keys| keys.get(public)) else {
            return Ok(None);
        };
        let bytes = pair.sign(message)?.to_bytes();
        let signature: [u8; SIGNATURE_LEN] =
            bytes
                .try_into()
                .map_err(|b: Vec<u8>| CryptoError::InvalidSignature(format!(
                    "signer produced {} bytes",
                    b.len()
                )))?;
        Ok(Some(signature))
    }

    /// All public keys of `key_type`, in ascending byte order.
    pub fn ed25519_public_keys(&self, key_type: KeyTypeId) -> Vec<[u8; 32]> {
        self.ed25519
            .get(&key_type)
            .map(|keys| keys.keys().copied().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sign::eddsa;

    const ACCO: KeyTypeId = KeyTypeId(*b"acco");
    const BABE: KeyTypeId = KeyTypeId(*b"babe");

    #[test]
    fn seeded_generation_is_deterministic_and_partitioned() {
        let mut store = Keystore::new();
        let a = store.ed25519_generate(ACCO, Some(&b"//Alice"[..])).unwrap();
        let b = store.ed25519_generate(ACCO, Some(&b"//Alice"[..])).unwrap();
        assert_eq!(a, b);
        assert_eq!(store.ed25519_public_keys(ACCO), vec![a]);
        assert!(store.ed25519_public_keys(BABE).is_empty());
    }

    #[test]
    fn sign_uses_the_stored_key_and_misses_cleanly() {
        let mut store = Keystore::new();
        let public = store.ed25519_generate(ACCO, None).unwrap();

        let sig = store.ed25519_sign(ACCO, &public, b"payload").unwrap().unwrap();
        assert!(eddsa::verify(&sig, b"payload", &public));

        assert_eq!(store.ed25519_sign(BABE, &public, b"payload"), Ok(None));
        assert_eq!(store.ed25519_sign(ACCO, &[0u8; 32], b"payload"), Ok(None));
    }
}
