//! Stake and cohort pool records.

use crate::address::Address;
use crate::amount::AssetKind;
use crate::keys::PublicKey;
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ledger key of a stake: the owner, plus a per-owner sequence in multi-stake mode.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StakeKey {
    pub owner: Address,
    pub sequence: Option<u64>,
}

impl StakeKey {
    /// Key of the single stake an owner may hold in single-stake mode.
    pub fn single(owner: Address) -> Self {
        Self {
            owner,
            sequence: None,
        }
    }

    pub fn multi(owner: Address, sequence: u64) -> Self {
        Self {
            owner,
            sequence: Some(sequence),
        }
    }
}

impl fmt::Display for StakeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sequence {
            Some(seq) => write!(f, "{}#{}", self.owner, seq),
            None => write!(f, "{}", self.owner),
        }
    }
}

/// Coarse weekly bucket derived from a stake's start time.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct CohortId(pub u64);

impl fmt::Display for CohortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cohort-{}", self.0)
    }
}

/// One open commitment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stake {
    /// Collateral in raw units. Zero means the slot is empty.
    pub amount: u128,
    pub asset: AssetKind,
    /// Daily-usage ceiling the participant committed to, in minutes.
    pub daily_limit_minutes: u32,
    pub start: Timestamp,
    pub duration_days: u32,
    /// Key every daily attestation must be signed with.
    pub public_key: PublicKey,
    pub successful_days: u32,
    pub settled: bool,
    pub cohort: CohortId,
}

impl Stake {
    pub fn is_open(&self) -> bool {
        self.amount > 0 && !self.settled
    }

    /// Natural end of the commitment: `start + duration * day_length`.
    pub fn end(&self, day_length_secs: u64) -> Timestamp {
        self.start
            .plus((self.duration_days as u64).saturating_mul(day_length_secs))
    }

    /// Binary outcome: every single day must have been attested as achieved.
    pub fn fully_successful(&self) -> bool {
        self.successful_days == self.duration_days
    }
}

/// Accounting record for one (cohort, asset) pair.
///
/// Invariant: `remaining_winners <= total_active`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CohortPool {
    /// Winner-pool share of slashed collateral not yet paid out or swept.
    pub pool: u128,
    /// Open stakers still counted as potential winners.
    pub remaining_winners: u64,
    /// Open stakers of this asset in this cohort.
    pub total_active: u64,
}

impl CohortPool {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
