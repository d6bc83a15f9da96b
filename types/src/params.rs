//! Economic parameters: time windows, entry limits and payout percentages.
//!
//! Everything here is read-only during settlement. Changing a value affects only
//! calls made after the change; nothing is recomputed retroactively.

use crate::amount::{AssetKind, UNIT};
use crate::error::ParamsError;
use crate::stake::CohortId;
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};

const DAY: u64 = 24 * 3600;

/// How stakes are addressed in the ledger.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StakeMode {
    /// One open stake per owner. Keys are released on settlement.
    #[default]
    Single,
    /// Many concurrent stakes per owner, indexed by a per-owner sequence.
    /// Keys stay bound to their first owner forever.
    Multi,
}

/// Primary split of a slashed stake, in whole percent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution {
    pub winner_percent: u8,
    pub treasury_percent: u8,
    pub charity_percent: u8,
}

impl Distribution {
    /// Build a distribution, rejecting percentages that do not sum to exactly 100.
    pub fn new(winner: u8, treasury: u8, charity: u8) -> Result<Self, ParamsError> {
        let d = Self {
            winner_percent: winner,
            treasury_percent: treasury,
            charity_percent: charity,
        };
        d.validate()?;
        Ok(d)
    }

    pub fn validate(&self) -> Result<(), ParamsError> {
        let sum =
            self.winner_percent as u32 + self.treasury_percent as u32 + self.charity_percent as u32;
        if sum != 100 {
            return Err(ParamsError::DistributionSum(sum));
        }
        Ok(())
    }
}

impl Default for Distribution {
    fn default() -> Self {
        Self {
            winner_percent: 40,
            treasury_percent: 40,
            charity_percent: 20,
        }
    }
}

/// Secondary split applied when a finalized pool still holds a remainder.
/// Charity receives everything the treasury does not.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepSplit {
    pub treasury_percent: u8,
}

impl Default for SweepSplit {
    fn default() -> Self {
        Self {
            treasury_percent: 67,
        }
    }
}

/// Time windows and entry limits for the engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomicParams {
    /// Length of one commitment day in seconds.
    pub day_length_secs: u64,
    /// How long after a day's window opens a proof is still accepted.
    pub proof_grace_secs: u64,
    /// Wait after a stake's natural end before anyone may force-settle it.
    pub resolution_buffer_secs: u64,
    /// Width of one cohort bucket in seconds.
    pub cohort_length_secs: u64,

    /// Allowed daily-usage ceiling, in minutes.
    pub min_daily_limit_minutes: u32,
    pub max_daily_limit_minutes: u32,

    /// Allowed commitment length, in days.
    pub min_duration_days: u32,
    pub max_duration_days: u32,

    /// Minimum collateral (raw) per asset kind.
    #[serde(with = "crate::amount::raw_amount")]
    pub min_native_stake: u128,
    #[serde(with = "crate::amount::raw_amount")]
    pub min_token_stake: u128,

    pub sweep: SweepSplit,
}

impl EconomicParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.day_length_secs == 0 {
            return Err(ParamsError::ZeroDayLength);
        }
        if self.cohort_length_secs == 0 {
            return Err(ParamsError::ZeroCohortLength);
        }
        if self.sweep.treasury_percent > 100 {
            return Err(ParamsError::SweepShare(self.sweep.treasury_percent));
        }
        check_range(
            "daily limit",
            self.min_daily_limit_minutes,
            self.max_daily_limit_minutes,
        )?;
        check_range("duration", self.min_duration_days, self.max_duration_days)?;
        if self.min_native_stake == 0 {
            return Err(ParamsError::ZeroMinimumStake("native"));
        }
        if self.min_token_stake == 0 {
            return Err(ParamsError::ZeroMinimumStake("token"));
        }
        Ok(())
    }

    pub fn min_stake(&self, asset: AssetKind) -> u128 {
        match asset {
            AssetKind::Native => self.min_native_stake,
            AssetKind::Token => self.min_token_stake,
        }
    }

    /// Cohort bucket a stake starting at `start` belongs to.
    pub fn cohort_of(&self, start: Timestamp) -> CohortId {
        CohortId(start.as_secs() / self.cohort_length_secs)
    }
}

fn check_range(name: &'static str, min: u32, max: u32) -> Result<(), ParamsError> {
    if min > max {
        return Err(ParamsError::EmptyRange {
            name,
            min: min as u64,
            max: max as u64,
        });
    }
    Ok(())
}

impl Default for EconomicParams {
    fn default() -> Self {
        Self {
            day_length_secs: DAY,
            proof_grace_secs: 6 * 3600,
            resolution_buffer_secs: 7 * DAY,
            cohort_length_secs: 7 * DAY,
            min_daily_limit_minutes: 1,
            max_daily_limit_minutes: 720,
            min_duration_days: 1,
            max_duration_days: 90,
            min_native_stake: UNIT / 1000,
            min_token_stake: UNIT,
            sweep: SweepSplit::default(),
        }
    }
}
