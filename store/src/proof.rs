use crate::StoreError;
use pledge_types::StakeKey;

/// Per-stake, per-day "already verified" flags. Absent means not verified.
pub trait ProofStore {
    fn is_day_verified(&self, stake: &StakeKey, day: u32) -> Result<bool, StoreError>;
}
