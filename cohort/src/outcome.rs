use serde::{Deserialize, Serialize};

/// Binary result of a commitment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Every day attested as achieved: full refund plus pool bonus.
    Win,
    /// Any shortfall at all: the whole collateral is slashed.
    Loss,
}

impl Outcome {
    pub fn from_days(successful_days: u32, duration_days: u32) -> Self {
        if successful_days == duration_days {
            Self::Win
        } else {
            Self::Loss
        }
    }
}
