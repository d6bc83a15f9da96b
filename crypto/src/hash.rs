//! Blake2b hashing for key fingerprints and attestation digests.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use pledge_types::{KeyFingerprint, PublicKey};

type Blake2b256 = Blake2b<U32>;

/// Compute a 256-bit Blake2b hash of arbitrary data.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    blake2b_256_multi(&[data])
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Key registry index for a public key.
pub fn key_fingerprint(public_key: &PublicKey) -> KeyFingerprint {
    KeyFingerprint(blake2b_256(public_key.as_bytes()))
}
