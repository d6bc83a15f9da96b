//! One owner per public key.
//!
//! A fingerprint is bound to the first owner who stakes with it. The same owner
//! may register it again; any other address is refused while the binding lasts.
//! Single-stake deployments release the binding on settlement, multi-stake
//! deployments keep it forever.

use pledge_crypto::{key_fingerprint, AttestationVerifier};
use pledge_store::{KeyRegistryStore, PledgeStore, StagedStore};
use pledge_types::{Address, KeyFingerprint, PublicKey};

use crate::SettlementError;

/// Bind `public_key` to `owner`, or confirm an existing binding to the same owner.
pub fn register<S: PledgeStore + ?Sized>(
    staged: &mut StagedStore<'_, S>,
    verifier: &dyn AttestationVerifier,
    public_key: &PublicKey,
    owner: &Address,
) -> Result<KeyFingerprint, SettlementError> {
    if !verifier.is_valid_key(public_key) {
        return Err(SettlementError::InvalidKey);
    }
    let fingerprint = key_fingerprint(public_key);
    match staged.key_owner(&fingerprint)? {
        Some(holder) if &holder == owner => {}
        Some(holder) => return Err(SettlementError::KeyTaken { owner: holder }),
        None => staged.put_key_owner(fingerprint, owner.clone()),
    }
    Ok(fingerprint)
}

/// Make `public_key` available to any owner again.
pub fn release<S: PledgeStore + ?Sized>(staged: &mut StagedStore<'_, S>, public_key: &PublicKey) {
    staged.delete_key_owner(key_fingerprint(public_key));
}
