//! Stake ledger.
//!
//! Owns the canonical record of every open commitment. In single-stake mode an
//! owner holds at most one stake; in multi-stake mode each stake is addressed by
//! the owner plus a per-owner sequence that is never reused.

pub mod days;
pub mod entry;
pub mod error;
pub mod ledger;

pub use days::{claimable_at, current_day, proof_window, resolvable_at, ProofWindow};
pub use entry::{new_stake, validate_entry, OpenStake};
pub use error::LedgerError;
pub use ledger::StakeLedger;
