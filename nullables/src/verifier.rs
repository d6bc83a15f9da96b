//! Nullable signature verifier.

use pledge_crypto::AttestationVerifier;
use pledge_types::{PublicKey, Signature};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Accepts or rejects every signature on command; keys are always valid
/// unless they are all zero.
pub struct NullVerifier {
    accept: AtomicBool,
    checks: AtomicUsize,
}

impl NullVerifier {
    pub fn accepting() -> Self {
        Self {
            accept: AtomicBool::new(true),
            checks: AtomicUsize::new(0),
        }
    }

    pub fn rejecting() -> Self {
        Self {
            accept: AtomicBool::new(false),
            checks: AtomicUsize::new(0),
        }
    }

    pub fn set_accept(&self, accept: bool) {
        self.accept.store(accept, Ordering::SeqCst);
    }

    /// How many signatures were checked.
    pub fn checks(&self) -> usize {
        self.checks.load(Ordering::SeqCst)
    }
}

impl AttestationVerifier for NullVerifier {
    fn is_valid_key(&self, public_key: &PublicKey) -> bool {
        public_key.0 != [0; 32]
    }

    fn verify(&self, _message: &[u8], _signature: &Signature, _public_key: &PublicKey) -> bool {
        self.checks.fetch_add(1, Ordering::SeqCst);
        self.accept.load(Ordering::SeqCst)
    }
}
