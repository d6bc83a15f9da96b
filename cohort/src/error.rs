use pledge_types::ParamsError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CohortError {
    #[error(transparent)]
    Params(#[from] ParamsError),

    #[error("arithmetic overflow in cohort accounting")]
    Overflow,

    #[error("settlement against a pool with no active stakers")]
    NoActiveStakers,

    #[error("pool invariant violated: {remaining_winners} remaining winners > {total_active} active")]
    WinnersExceedActive {
        remaining_winners: u64,
        total_active: u64,
    },
}
