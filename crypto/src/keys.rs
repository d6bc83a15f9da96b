//! Ed25519 key generation and validation.

use ed25519_dalek::{SigningKey, VerifyingKey};
use pledge_types::{KeyPair, PrivateKey, PublicKey};
use thiserror::Error;
use zeroize::Zeroizing;

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("system randomness unavailable: {0}")]
    Entropy(String),
}

/// Generate a new key pair from the operating system's random source.
pub fn generate_keypair() -> Result<KeyPair, KeyError> {
    let mut seed = Zeroizing::new([0u8; 32]);
    getrandom::getrandom(&mut *seed).map_err(|e| KeyError::Entropy(e.to_string()))?;
    Ok(keypair_from_seed(&seed))
}

/// Derive a key pair from a 32-byte seed (deterministic).
pub fn keypair_from_seed(seed: &[u8; 32]) -> KeyPair {
    let signing_key = SigningKey::from_bytes(seed);
    KeyPair {
        public: PublicKey(signing_key.verifying_key().to_bytes()),
        private: PrivateKey(signing_key.to_bytes()),
    }
}

/// Whether the bytes decompress to a point on the curve.
///
/// Stakes may only be bound to keys that pass this check; anything else could
/// never produce a verifiable attestation and would lock the stake into a loss.
pub fn is_valid_public_key(public_key: &PublicKey) -> bool {
    VerifyingKey::from_bytes(&public_key.0).is_ok()
}
