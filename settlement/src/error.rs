use pledge_cohort::CohortError;
use pledge_ledger::LedgerError;
use pledge_store::StoreError;
use pledge_types::{Address, ParamsError, Timestamp};
use thiserror::Error;

use crate::transfer::TransferError;

#[derive(Debug, Error)]
pub enum SettlementError {
    #[error("public key is not a valid curve point")]
    InvalidKey,

    #[error("public key already bound to {owner}")]
    KeyTaken { owner: Address },

    #[error("attestation signature does not verify against the stake key")]
    InvalidSignature,

    #[error("day {day} already verified")]
    AlreadyVerified { day: u32 },

    #[error("proof window for day {day} is closed")]
    WindowClosed { day: u32 },

    #[error("too early: allowed from {allowed_at}")]
    TooEarly { allowed_at: Timestamp },

    #[error("arithmetic overflow")]
    Overflow,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Cohort(#[from] CohortError),

    #[error(transparent)]
    Params(#[from] ParamsError),

    #[error("transfer failed: {0}")]
    Transfer(#[from] TransferError),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl SettlementError {
    /// Bad caller input. Rejected before any write; retrying with corrected
    /// input can succeed.
    pub fn is_validation(&self) -> bool {
        match self {
            Self::InvalidKey
            | Self::KeyTaken { .. }
            | Self::InvalidSignature
            | Self::AlreadyVerified { .. }
            | Self::WindowClosed { .. } => true,
            Self::Ledger(e) => matches!(
                e,
                LedgerError::GoalOutOfRange { .. }
                    | LedgerError::DurationOutOfRange { .. }
                    | LedgerError::AmountBelowMinimum { .. }
                    | LedgerError::AlreadyStaked(_)
                    | LedgerError::InvalidDay { .. }
            ),
            _ => false,
        }
    }

    /// The stake is not in a state that allows the call (yet).
    pub fn is_state(&self) -> bool {
        match self {
            Self::TooEarly { .. } => true,
            Self::Ledger(e) => matches!(
                e,
                LedgerError::NotFound(_) | LedgerError::AlreadySettled(_)
            ),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pledge_types::StakeKey;

    #[test]
    fn classification() {
        assert!(SettlementError::WindowClosed { day: 0 }.is_validation());
        assert!(SettlementError::Ledger(LedgerError::InvalidDay {
            day: 9,
            duration: 7
        })
        .is_validation());

        let missing = SettlementError::Ledger(LedgerError::NotFound(StakeKey::single(
            Address::new("bob"),
        )));
        assert!(missing.is_state());
        assert!(!missing.is_validation());

        let transfer = SettlementError::Transfer(TransferError::Rejected(Address::new("bob")));
        assert!(!transfer.is_state());
        assert!(!transfer.is_validation());
    }
}
