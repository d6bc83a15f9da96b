use crate::StoreError;
use pledge_types::{Address, KeyFingerprint};

/// Public-key fingerprint → owning address.
pub trait KeyRegistryStore {
    fn key_owner(&self, fingerprint: &KeyFingerprint) -> Result<Option<Address>, StoreError>;
}
