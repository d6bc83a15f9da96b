//! Cohort accounting engine.
//!
//! Slashed collateral is pooled per (cohort, asset). Fully successful stakers
//! draw a bonus from their own pool when they settle; whatever is left when the
//! last staker of a pool settles is swept to treasury and charity.
//!
//! Everything here is a pure function of a [`CohortPool`](pledge_types::CohortPool)
//! record and the settlement inputs. Reading and writing the records is the
//! caller's job.
//!
//! Settlement order is not controlled by this crate. A winner who settles before
//! the losers of their cohort receives a smaller bonus than one who settles
//! after them; that property is accepted, not corrected.

pub mod distribution;
pub mod engine;
pub mod error;
pub mod outcome;

pub use distribution::{mul_percent, split_loss, split_sweep, LossSplit, SweepShares};
pub use engine::{CohortEngine, CohortSettlement};
pub use error::CohortError;
pub use outcome::Outcome;
