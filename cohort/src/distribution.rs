//! Percentage splits of slashed collateral and pool remainders.
//!
//! Every split is exact: the last share takes whatever the integer divisions
//! of the earlier shares left behind, so the parts always sum to the input.

use pledge_types::{Distribution, SweepSplit};
use serde::{Deserialize, Serialize};

/// `floor(amount * percent / 100)` without overflowing for any `u128` amount.
pub fn mul_percent(amount: u128, percent: u8) -> u128 {
    let p = percent as u128;
    (amount / 100) * p + (amount % 100) * p / 100
}

/// Where one slashed stake goes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LossSplit {
    /// Added to the cohort pool for later winners.
    pub winner_pool: u128,
    /// Paid out to the treasury immediately.
    pub treasury: u128,
    /// Paid out to charity immediately.
    pub charity: u128,
}

impl LossSplit {
    pub fn total(&self) -> u128 {
        self.winner_pool + self.treasury + self.charity
    }
}

/// Split a slashed amount by the primary distribution. Charity absorbs rounding.
pub fn split_loss(amount: u128, distribution: &Distribution) -> LossSplit {
    let winner_pool = mul_percent(amount, distribution.winner_percent);
    let treasury = mul_percent(amount, distribution.treasury_percent);
    LossSplit {
        winner_pool,
        treasury,
        charity: amount - winner_pool - treasury,
    }
}

/// Where a finalized pool's remainder goes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepShares {
    pub treasury: u128,
    pub charity: u128,
}

impl SweepShares {
    pub fn total(&self) -> u128 {
        self.treasury + self.charity
    }
}

/// Split a pool remainder by the secondary sweep split.
pub fn split_sweep(remainder: u128, sweep: &SweepSplit) -> SweepShares {
    let treasury = mul_percent(remainder, sweep.treasury_percent);
    SweepShares {
        treasury,
        charity: remainder - treasury,
    }
}
