//! Asset transfer collaborator.

use pledge_types::{Address, AssetKind};
use serde::Serialize;
use thiserror::Error;

use crate::SettlementError;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("recipient {0} cannot receive funds")]
    Rejected(Address),

    #[error("insufficient {asset} balance for transfer of {amount}")]
    InsufficientBalance { asset: AssetKind, amount: u128 },

    #[error("{0}")]
    Failed(String),
}

/// One leg of a settlement's payouts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Payout {
    pub to: Address,
    pub amount: u128,
}

/// Moves escrowed collateral out of the pool.
///
/// `transfer_all` moves every payout of a batch or none of them, and must not
/// call back into the engine before returning. A rejection names the
/// recipient that refused.
pub trait AssetTransfer: Send + Sync {
    fn transfer_all(&self, asset: AssetKind, payouts: &[Payout]) -> Result<(), TransferError>;

    fn transfer(&self, asset: AssetKind, to: &Address, amount: u128) -> Result<(), TransferError> {
        self.transfer_all(
            asset,
            &[Payout {
                to: to.clone(),
                amount,
            }],
        )
    }
}

/// Append `amount` for `to`, folding it into an existing leg for the same
/// recipient. Zero amounts are dropped.
pub(crate) fn add_payout(
    payouts: &mut Vec<Payout>,
    to: &Address,
    amount: u128,
) -> Result<(), SettlementError> {
    if amount == 0 {
        return Ok(());
    }
    match payouts.iter_mut().find(|p| &p.to == to) {
        Some(existing) => {
            existing.amount = existing
                .amount
                .checked_add(amount)
                .ok_or(SettlementError::Overflow)?;
        }
        None => payouts.push(Payout {
            to: to.clone(),
            amount,
        }),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payouts_fold_by_recipient() {
        let treasury = Address::new("treasury");
        let charity = Address::new("charity");
        let mut payouts = Vec::new();
        add_payout(&mut payouts, &treasury, 40).unwrap();
        add_payout(&mut payouts, &charity, 0).unwrap();
        add_payout(&mut payouts, &charity, 20).unwrap();
        add_payout(&mut payouts, &treasury, 27).unwrap();
        assert_eq!(
            payouts,
            vec![
                Payout { to: treasury.clone(), amount: 67 },
                Payout { to: charity, amount: 20 },
            ]
        );
        assert!(matches!(
            add_payout(&mut payouts, &treasury, u128::MAX),
            Err(SettlementError::Overflow)
        ));
    }
}
