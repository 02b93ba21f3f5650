// Path: crates/crypto/src/sign/eddsa/mod.rs
//! Ed25519 signatures using dcrypt

use crate::error::CryptoError;
use dcrypt::api::Signature as SignatureTrait;
use rand::rngs::OsRng;
use sbx_api::crypto::{SerializableKey, Signature, SigningKey, SigningKeyPair, VerifyingKey};

// Import dcrypt Ed25519 module with module qualification
use dcrypt::sign::eddsa;

/// Length of an encoded public key.
pub const PUBLIC_KEY_LEN: usize = 32;
/// Length of an encoded signature.
pub const SIGNATURE_LEN: usize = 64;

/// Ed25519 key pair implementation
#[derive(Clone)]
pub struct Ed25519KeyPair {
    /// Public verification key
    public_key: eddsa::Ed25519PublicKey,
    /// Private signing key
    secret_key: eddsa::Ed25519SecretKey,
}

/// Ed25519 signature implementation
pub struct Ed25519Signature(eddsa::Ed25519Signature);

/// Ed25519 public key implementation
pub struct Ed25519PublicKey(eddsa::Ed25519PublicKey);

/// Ed25519 private key implementation
pub struct Ed25519PrivateKey(eddsa::Ed25519SecretKey);

impl Ed25519KeyPair {
    /// Generate a new Ed25519 key pair
    pub fn generate() -> Result<Self, CryptoError> {
        let mut rng = OsRng;
        let (public_key, secret_key) =
            eddsa::Ed25519::keypair(&mut rng).map_err(CryptoError::from)?;
        Ok(Self {
            public_key,
            secret_key,
        })
    }

    /// Derive a key pair deterministically from a 32-byte seed
    pub fn from_seed(seed: &[u8; 32]) -> Result<Self, CryptoError> {
        let secret_key = eddsa::Ed25519SecretKey::from_seed(seed).map_err(|e| {
            CryptoError::InvalidKey(format!("Failed to create secret key from seed: {:?}", e))
        })?;
        let public_key = secret_key.public_key().map_err(CryptoError::from)?;
        Ok(Self {
            public_key,
            secret_key,
        })
    }

    /// Create from an existing private key
    pub fn from_private_key(private_key: &Ed25519PrivateKey) -> Result<Self, CryptoError> {
        let secret_key = private_key.0.clone();
        let public_key = secret_key.public_key().map_err(CryptoError::from)?;
        Ok(Self {
            public_key,
            secret_key,
        })
    }

    /// The raw 32-byte public key
    pub fn public_key_bytes(&self) -> [u8; PUBLIC_KEY_LEN] {
        self.public_key.0
    }
}

impl SigningKeyPair for Ed25519KeyPair {
    type PublicKey = Ed25519PublicKey;
    type PrivateKey = Ed25519PrivateKey;
    type Signature = Ed25519Signature;

    fn public_key(&self) -> Self::PublicKey {
        Ed25519PublicKey(self.public_key.clone())
    }

    fn private_key(&self) -> Self::PrivateKey {
        Ed25519PrivateKey(self.secret_key.clone())
    }

    fn sign(&self, message: &[u8]) -> Result<Self::Signature, CryptoError> {
        let signature = eddsa::Ed25519::sign(message, &self.secret_key)?;
        Ok(Ed25519Signature(signature))
    }
}

impl VerifyingKey for Ed25519PublicKey {
    type Signature = Ed25519Signature;

    fn verify(&self, message: &[u8], signature: &Self::Signature) -> Result<(), CryptoError> {
        eddsa::Ed25519::verify(message, &signature.0, &self.0).map_err(CryptoError::from)
    }
}

impl SerializableKey for Ed25519PublicKey {
    fn to_bytes(&self) -> Vec<u8> {
        self.0.to_bytes().to_vec()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != PUBLIC_KEY_LEN {
            return Err(CryptoError::InvalidKey(format!(
                "expected {} bytes, got {}",
                PUBLIC_KEY_LEN,
                bytes.len()
            )));
        }
        eddsa::Ed25519PublicKey::from_bytes(bytes)
            .map(Ed25519PublicKey)
            .map_err(|e| CryptoError::InvalidKey(format!("Failed to parse public key: {:?}", e)))
    }
}

impl SigningKey for Ed25519PrivateKey {
    type Signature = Ed25519Signature;

    fn sign(&self, message: &[u8]) -> Result<Self::Signature, CryptoError> {
        let signature = eddsa::Ed25519::sign(message, &self.0)?;
        Ok(Ed25519Signature(signature))
    }
}

impl SerializableKey for Ed25519PrivateKey {
    fn to_bytes(&self) -> Vec<u8> {
        // Export just the seed (32 bytes)
        self.0.seed().to_vec()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let seed: [u8; 32] = bytes.try_into().map_err(|_| {
            CryptoError::InvalidKey("Invalid private key length: expected 32 bytes".to_string())
        })?;
        eddsa::Ed25519SecretKey::from_seed(&seed)
            .map(Ed25519PrivateKey)
            .map_err(|e| {
                CryptoError::InvalidKey(format!("Failed to create secret key from seed: {:?}", e))
            })
    }
}

impl SerializableKey for Ed25519Signature {
    fn to_bytes(&self) -> Vec<u8> {
        self.0.to_bytes().to_vec()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != SIGNATURE_LEN {
            return Err(CryptoError::InvalidSignature(format!(
                "expected {} bytes, got {}",
                SIGNATURE_LEN,
                bytes.len()
            )));
        }
        eddsa::Ed25519Signature::from_bytes(bytes)
            .map(Ed25519Signature)
            .map_err(|e| {
                CryptoError::InvalidSignature(format!("Failed to parse signature: {:?}", e))
            })
    }
}

impl Signature for Ed25519Signature {}

impl Ed25519Signature {
    /// Get the raw signature bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0 .0
    }
}

impl Ed25519PublicKey {
    /// Get the raw public key bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0 .0
    }
}

impl Ed25519PrivateKey {
    /// Get the public key corresponding to this private key
    pub fn public_key(&self) -> Result<Ed25519PublicKey, CryptoError> {
        self.0
            .public_key()
            .map(Ed25519PublicKey)
            .map_err(CryptoError::from)
    }
}

/// Whether `public_key` and `signature` decode as Ed25519 material.
///
/// This is the cheap structural check a batch session answers immediately.
pub fn is_well_formed(signature: &[u8], public_key: &[u8]) -> bool {
    Ed25519PublicKey::from_bytes(public_key).is_ok()
        && Ed25519Signature::from_bytes(signature).is_ok()
}

/// Verifies one Ed25519 signature. Malformed input is simply invalid.
pub fn verify(signature: &[u8], message: &[u8], public_key: &[u8]) -> bool {
    let Ok(pk) = Ed25519PublicKey::from_bytes(public_key) else {
        return false;
    };
    let Ok(sig) = Ed25519Signature::from_bytes(signature) else {
        return false;
    };
    pk.verify(message, &sig).is_ok()
}

#[cfg(test)]
mod tests;
