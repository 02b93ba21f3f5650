// Path: crates/api/src/crypto/mod.rs
//! Defines unified traits for cryptographic primitives.

use crate::error::CryptoError;
use sbx_types::app::SignatureSuite;

/// A trait for any key that can be serialized to and from bytes.
pub trait SerializableKey {
    /// Converts the key to a byte vector.
    fn to_bytes(&self) -> Vec<u8>;

    /// Creates a key from a byte slice.
    fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError>
    where
        Self: Sized;
}

/// A trait for a key pair used in a signature algorithm.
pub trait SigningKeyPair {
    /// The public key type used for verification.
    type PublicKey: VerifyingKey<Signature = Self::Signature>;
    /// The private key type used for signing.
    type PrivateKey: SigningKey<Signature = Self::Signature>;
    /// The signature type produced.
    type Signature: Signature;

    /// Gets the public key.
    fn public_key(&self) -> Self::PublicKey;
    /// Gets the private key.
    fn private_key(&self) -> Self::PrivateKey;
    /// Signs a message with the private key.
    fn sign(&self, message: &[u8]) -> Result<Self::Signature, CryptoError>;
}

/// A trait for a public key used for signature verification.
pub trait VerifyingKey: SerializableKey {
    /// The signature type that this key can verify.
    type Signature: Signature;
    /// Verifies a signature against a message.
    fn verify(&self, message: &[u8], signature: &Self::Signature) -> Result<(), CryptoError>;
}

/// A trait for a private key used for signing operations.
pub trait SigningKey: SerializableKey {
    /// The signature type that this key produces.
    type Signature: Signature;
    /// Signs a message.
    fn sign(&self, message: &[u8]) -> Result<Self::Signature, CryptoError>;
}

/// A marker trait for a cryptographic signature.
pub trait Signature: SerializableKey {}

/// A single deferred signature check: `(public_key, message, signature, suite)`.
pub type VerificationItem<'a> = (&'a [u8], &'a [u8], &'a [u8], SignatureSuite);

/// A trait for parallelized batch signature verification.
pub trait BatchVerifier: Send + Sync {
    /// Verifies a batch of signatures.
    ///
    /// Returns one boolean per item, in input order. A malformed key or signature
    /// yields `false` for that item rather than an error; `Err` is reserved for
    /// failures of the verifier itself.
    fn verify_batch(&self, items: &[VerificationItem<'_>]) -> Result<Vec<bool>, CryptoError>;
}

impl<T: BatchVerifier + ?Sized> BatchVerifier for Box<T> {
    fn verify_batch(&self, items: &[VerificationItem<'_>]) -> Result<Vec<bool>, CryptoError> {
        (**self).verify_batch(items)
    }
}
