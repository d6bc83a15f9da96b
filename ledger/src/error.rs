use pledge_store::StoreError;
use pledge_types::{AssetKind, StakeKey};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("daily limit {value} minutes outside allowed range {min}..={max}")]
    GoalOutOfRange { value: u32, min: u32, max: u32 },

    #[error("duration {value} days outside allowed range {min}..={max}")]
    DurationOutOfRange { value: u32, min: u32, max: u32 },

    #[error("{asset} stake of {amount} below minimum {minimum}")]
    AmountBelowMinimum {
        asset: AssetKind,
        amount: u128,
        minimum: u128,
    },

    #[error("owner already has an open stake at {0}")]
    AlreadyStaked(StakeKey),

    #[error("no open stake at {0}")]
    NotFound(StakeKey),

    #[error("stake at {0} was already settled")]
    AlreadySettled(StakeKey),

    #[error("day {day} outside stake duration of {duration} days")]
    InvalidDay { day: u32, duration: u32 },

    #[error("counter overflow")]
    Overflow,

    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}
