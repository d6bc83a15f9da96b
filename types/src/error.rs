//! Parameter validation errors.

use thiserror::Error;

/// Raised when economic parameters or distribution percentages are inconsistent.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParamsError {
    #[error("distribution percentages must sum to 100, got {0}")]
    DistributionSum(u32),

    #[error("sweep treasury share must be at most 100, got {0}")]
    SweepShare(u8),

    #[error("day length must be non-zero")]
    ZeroDayLength,

    #[error("cohort bucket length must be non-zero")]
    ZeroCohortLength,

    #[error("empty range for {name}: min {min} > max {max}")]
    EmptyRange {
        name: &'static str,
        min: u64,
        max: u64,
    },

    #[error("minimum {0} stake must be non-zero")]
    ZeroMinimumStake(&'static str),
}
