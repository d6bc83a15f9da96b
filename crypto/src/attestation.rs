//! Daily outcome attestations.
//!
//! A participant attests each day's outcome by signing a digest that binds the
//! deployment, the stake, the day index and the outcome flag. Replaying the
//! signature for another stake, another day or another deployment changes the
//! digest and fails verification.

use pledge_types::{Deployment, PublicKey, Signature, StakeKey};

use crate::hash::blake2b_256_multi;
use crate::keys::is_valid_public_key;
use crate::sign::verify_signature;

const DOMAIN_TAG: &[u8] = b"pledge/daily-attestation/v1";

/// The statement a participant signs for one day.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DailyAttestation<'a> {
    pub deployment: &'a Deployment,
    pub stake: &'a StakeKey,
    pub day: u32,
    pub achieved: bool,
}

impl DailyAttestation<'_> {
    /// Canonical 32-byte message that gets signed.
    pub fn digest(&self) -> [u8; 32] {
        attestation_digest(self.deployment, self.stake, self.day, self.achieved)
    }
}

/// Canonical digest of an attestation.
///
/// Variable-length fields are length-prefixed so no two distinct attestations
/// can serialize to the same byte stream.
pub fn attestation_digest(
    deployment: &Deployment,
    stake: &StakeKey,
    day: u32,
    achieved: bool,
) -> [u8; 32] {
    let contract = deployment.contract.as_bytes();
    let owner = stake.owner.as_bytes();
    let (has_seq, seq) = match stake.sequence {
        Some(seq) => (1u8, seq),
        None => (0u8, 0),
    };
    blake2b_256_multi(&[
        DOMAIN_TAG,
        &deployment.chain_id.to_be_bytes(),
        &(contract.len() as u32).to_be_bytes(),
        contract,
        &(owner.len() as u32).to_be_bytes(),
        owner,
        &[has_seq],
        &seq.to_be_bytes(),
        &day.to_be_bytes(),
        &[achieved as u8],
    ])
}

/// Signature scheme the settlement core delegates to.
///
/// Injected so the core can be exercised with stub verifiers.
pub trait AttestationVerifier: Send + Sync {
    /// Whether `public_key` is a usable key for this scheme.
    fn is_valid_key(&self, public_key: &PublicKey) -> bool;

    /// Whether `signature` over `message` was produced by `public_key`.
    fn verify(&self, message: &[u8], signature: &Signature, public_key: &PublicKey) -> bool;
}

/// Ed25519 verifier used in production.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ed25519Verifier;

impl AttestationVerifier for Ed25519Verifier {
    fn is_valid_key(&self, public_key: &PublicKey) -> bool {
        is_valid_public_key(public_key)
    }

    fn verify(&self, message: &[u8], signature: &Signature, public_key: &PublicKey) -> bool {
        verify_signature(message, signature, public_key)
    }
}
