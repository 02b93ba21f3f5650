// Path: crates/crypto/src/algorithms/hash/mod.rs
//! Cryptographic hash functions using dcrypt

use crate::error::CryptoError;
use dcrypt::algorithms::hash::blake2::{Blake2b as DcryptBlake2b, Blake2s as DcryptBlake2s};
use dcrypt::algorithms::hash::sha2::{Sha256 as DcryptSha256, Sha512 as DcryptSha512};
use dcrypt::algorithms::hash::HashFunction as DcryptHashFunction;
use dcrypt::algorithms::hash::Keccak256 as DcryptKeccak256;
use sbx_api::host::HashAlgorithm;

/// Hash function trait
pub trait HashFunction {
    /// Hash a message and return the digest
    fn hash(&self, message: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Get the digest size in bytes
    fn digest_size(&self) -> usize;

    /// Get the name of the hash function
    fn name(&self) -> &str;
}

// Every dcrypt digest is wrapped the same way: hash, widen the algorithm error
// into `dcrypt::Error`, copy out the bytes.
macro_rules! dcrypt_hash {
    ($(#[$doc:meta])* $name:ident, $inner:ty, $size:expr, $label:expr) => {
        $(#[$doc])*
        #[derive(Default, Clone, Copy, Debug)]
        pub struct $name;

        impl HashFunction for $name {
            fn hash(&self, message: &[u8]) -> Result<Vec<u8>, CryptoError> {
                let digest = <$inner>::digest(message).map_err(dcrypt::Error::from)?;
                Ok(digest.as_ref().to_vec())
            }

            fn digest_size(&self) -> usize {
                $size
            }

            fn name(&self) -> &str {
                $label
            }
        }
    };
}

dcrypt_hash!(
    /// SHA-256 hash function implementation using dcrypt
    Sha256Hash, DcryptSha256, 32, "SHA-256"
);
dcrypt_hash!(
    /// SHA-512 hash function implementation using dcrypt
    Sha512Hash, DcryptSha512, 64, "SHA-512"
);
dcrypt_hash!(
    /// Keccak-256 (pre-standard SHA-3 padding) using dcrypt
    Keccak256Hash, DcryptKeccak256, 32, "Keccak-256"
);
dcrypt_hash!(
    /// BLAKE2b with a 64-byte output using dcrypt
    Blake2b512Hash, DcryptBlake2b, 64, "BLAKE2b-512"
);
dcrypt_hash!(
    /// BLAKE2s with a 32-byte output using dcrypt
    Blake2s256Hash, DcryptBlake2s, 32, "BLAKE2s-256"
);

fn fixed<const N: usize>(bytes: Vec<u8>) -> Result<[u8; N], CryptoError> {
    bytes
        .try_into()
        .map_err(|bytes: Vec<u8>| CryptoError::InvalidHashLength {
            expected: N,
            got: bytes.len(),
        })
}

/// Create a SHA-256 hash of any type that can be referenced as bytes
pub fn sha256<T: AsRef<[u8]>>(data: T) -> Result<[u8; 32], CryptoError> {
    fixed(Sha256Hash.hash(data.as_ref())?)
}

/// Create a SHA-512 hash of any type that can be referenced as bytes
pub fn sha512<T: AsRef<[u8]>>(data: T) -> Result<[u8; 64], CryptoError> {
    fixed(Sha512Hash.hash(data.as_ref())?)
}

/// Create a Keccak-256 hash
pub fn keccak256<T: AsRef<[u8]>>(data: T) -> Result<[u8; 32], CryptoError> {
    fixed(Keccak256Hash.hash(data.as_ref())?)
}

/// Create a BLAKE2b-512 hash
pub fn blake2b_512<T: AsRef<[u8]>>(data: T) -> Result<[u8; 64], CryptoError> {
    fixed(Blake2b512Hash.hash(data.as_ref())?)
}

/// Create a BLAKE2s-256 hash
pub fn blake2s_256<T: AsRef<[u8]>>(data: T) -> Result<[u8; 32], CryptoError> {
    fixed(Blake2s256Hash.hash(data.as_ref())?)
}

/// Hashes `data` with the algorithm named by a `hashing.*` host call.
pub fn digest(algorithm: HashAlgorithm, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let out = match algorithm {
        HashAlgorithm::Sha2_256 => Sha256Hash.hash(data)?,
        HashAlgorithm::Sha2_512 => Sha512Hash.hash(data)?,
        HashAlgorithm::Keccak256 => Keccak256Hash.hash(data)?,
        HashAlgorithm::Blake2b512 => Blake2b512Hash.hash(data)?,
        HashAlgorithm::Blake2s256 => Blake2s256Hash.hash(data)?,
    };
    if out.len() != algorithm.output_len() {
        return Err(CryptoError::InvalidHashLength {
            expected: algorithm.output_len(),
            got: out.len(),
        });
    }
    Ok(out)
}
