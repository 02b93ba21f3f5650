// Path: crates/crypto/src/sign/batch.rs

use crate::error::CryptoError;
use crate::sign::eddsa;
use rayon::prelude::*;
use sbx_api::crypto::{BatchVerifier, VerificationItem};
use sbx_types::app::SignatureSuite;

/// A CPU-based batch verifier that uses Rayon for parallelism.
#[derive(Debug, Clone, Copy)]
pub struct CpuBatchVerifier {
    parallel: bool,
}

impl Default for CpuBatchVerifier {
    fn default() -> Self {
        Self { parallel: true }
    }
}

impl CpuBatchVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A verifier that checks items on the calling thread.
    pub fn sequential() -> Self {
        Self { parallel: false }
    }

    fn verify_single(
        &self,
        public_key: &[u8],
        message: &[u8],
        signature: &[u8],
        suite: SignatureSuite,
    ) -> bool {
        match suite {
            SignatureSuite::ED25519 => eddsa::verify(signature, message, public_key),
            _ => false, // Fallback for unknown IDs
        }
    }
}

impl BatchVerifier for CpuBatchVerifier {
    fn verify_batch(&self, items: &[VerificationItem<'_>]) -> Result<Vec<bool>, CryptoError> {
        let check = |(pk, msg, sig, suite): &VerificationItem<'_>| {
            self.verify_single(pk, msg, sig, *suite)
        };
        let results: Vec<bool> = if self.parallel {
            items.par_iter().map(check).collect()
        } else {
            items.iter().map(check).collect()
        };
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sign::eddsa::Ed25519KeyPair;
    use sbx_api::crypto::{SerializableKey, SigningKeyPair};

    #[test]
    fn results_follow_input_order() {
        let kp = Ed25519KeyPair::from_seed(&[1u8; 32]).unwrap();
        let pk = kp.public_key_bytes();
        let good = kp.sign(b"one").unwrap().to_bytes();
        let items: Vec<VerificationItem<'_>> = vec![
            (&pk[..], &b"one"[..], good.as_slice(), SignatureSuite::ED25519),
            (&pk[..], &b"two"[..], good.as_slice(), SignatureSuite::ED25519),
            (&pk[..], &b"one"[..], good.as_slice(), SignatureSuite(-7)),
        ];

        for verifier in [CpuBatchVerifier::new(), CpuBatchVerifier::sequential()] {
            let results = verifier.verify_batch(&items).unwrap();
            assert_eq!(results, vec![true, false, false]);
        }
    }
}
