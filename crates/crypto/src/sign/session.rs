// Path: crates/crypto/src/sign/session.rs
//! The accumulate-then-finalize batch verification session.
//!
//! A session is Closed until `start`, collects deferred checks while Open, and
//! returns to Closed on `finish`. It is owned by one execution context; nothing
//! here is global.

use crate::error::CryptoError;
use crate::sign::batch::CpuBatchVerifier;
use crate::sign::eddsa;
use sbx_api::crypto::{BatchVerifier, VerificationItem};
use sbx_types::app::SignatureSuite;

/// One queued signature check, evaluated at `finish`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCheck {
    pub suite: SignatureSuite,
    pub public_key: Vec<u8>,
    pub message: Vec<u8>,
    pub signature: Vec<u8>,
}

/// Per-context batch verification state.
#[derive(Debug)]
pub struct BatchVerificationSession<V: BatchVerifier = CpuBatchVerifier> {
    verifier: V,
    /// `None` while Closed.
    pending: Option<Vec<PendingCheck>>,
}

impl Default for BatchVerificationSession<CpuBatchVerifier> {
    fn default() -> Self {
        Self::new(CpuBatchVerifier::default())
    }
}

impl<V: BatchVerifier> BatchVerificationSession<V> {
    pub fn new(verifier: V) -> Self {
        Self {
            verifier,
            pending: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    /// Number of checks queued in the open session.
    pub fn pending_len(&self) -> usize {
        self.pending.as_ref().map_or(0, Vec::len)
    }

    /// Opens a session. Fails if one is already open.
    pub fn start(&mut self) -> Result<(), CryptoError> {
        if self.pending.is_some() {
            return Err(CryptoError::BatchSessionAlreadyOpen);
        }
        self.pending = Some(Vec::new());
        Ok(())
    }

    /// Queues an Ed25519 check and returns the immediate structural verdict.
    ///
    /// `true` means the key and signature decode; the signature itself is only
    /// checked at `finish`. Malformed requests are still queued so that `finish`
    /// reports them.
    pub fn queue_ed25519(
        &mut self,
        signature: &[u8],
        message: &[u8],
        public_key: &[u8],
    ) -> Result<bool, CryptoError> {
        let pending = self.pending.as_mut().ok_or(CryptoError::NoBatchSession)?;
        let well_formed = eddsa::is_well_formed(signature, public_key);
        pending.push(PendingCheck {
            suite: SignatureSuite::ED25519,
            public_key: public_key.to_vec(),
            message: message.to_vec(),
            signature: signature.to_vec(),
        });
        Ok(well_formed)
    }

    /// Evaluates every queued check, closes the session and reports whether all passed.
    pub fn finish(&mut self) -> Result<bool, CryptoError> {
        let pending = self.pending.take().ok_or(CryptoError::NoBatchSession)?;
        if pending.is_empty() {
            return Ok(true);
        }
        let items: Vec<VerificationItem<'_>> = pending
            .iter()
            .map(|c| {
                (
                    c.public_key.as_slice(),
                    c.message.as_slice(),
                    c.signature.as_slice(),
                    c.suite,
                )
            })
            .collect();
        let results = self.verifier.verify_batch(&items)?;
        if results.len() != items.len() {
            return Err(CryptoError::OperationFailed(format!(
                "batch verifier returned {} results for {} items",
                results.len(),
                items.len()
            )));
        }
        let failed = results.iter().filter(|ok| !**ok).count();
        log::debug!(
            "batch verification finished: {} checks, {} failed",
            items.len(),
            failed
        );
        Ok(failed == 0)
    }

    /// Closes an unfinished session, discarding its queue.
    ///
    /// Returns the number of discarded checks, or `None` if no session was open.
    /// An abandoned session never counts as passed.
    pub fn abandon(&mut self) -> Option<usize> {
        let discarded = self.pending.take().map(|p| p.len());
        if let Some(n) = discarded {
            log::warn!(
                "batch verification session abandoned with {} pending checks; treated as invalid",
                n
            );
        }
        discarded
    }
}

impl<V: BatchVerifier> Drop for BatchVerificationSession<V> {
    fn drop(&mut self) {
        self.abandon();
    }
}
