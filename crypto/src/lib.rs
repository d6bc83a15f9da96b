//! Cryptographic primitives for the pledge engine.
//!
//! - **Ed25519** for attestation signing and verification
//! - **Blake2b** for key fingerprints and attestation digests
//! - The canonical attestation message and the `AttestationVerifier` capability
//!   the settlement core consumes

pub mod attestation;
pub mod hash;
pub mod keys;
pub mod sign;

pub use attestation::{
    attestation_digest, AttestationVerifier, DailyAttestation, Ed25519Verifier,
};
pub use hash::{blake2b_256, blake2b_256_multi, key_fingerprint};
pub use keys::{generate_keypair, is_valid_public_key, keypair_from_seed, KeyError};
pub use sign::{sign_message, verify_signature};
