//! Nullable asset transfer: records payouts instead of moving funds.

use pledge_settlement::{AssetTransfer, Payout, TransferError};
use pledge_types::{Address, AssetKind};
use std::collections::HashSet;
use std::sync::Mutex;

/// One successful transfer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferRecord {
    pub asset: AssetKind,
    pub to: Address,
    pub amount: u128,
}

/// Records every transfer; recipients can be marked as unable to receive.
///
/// A batch naming any rejecting recipient fails as a whole and records nothing.
#[derive(Default)]
pub struct NullTransfer {
    sent: Mutex<Vec<TransferRecord>>,
    rejecting: Mutex<HashSet<Address>>,
}

impl NullTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every future transfer to `address` fail.
    pub fn reject(&self, address: &Address) {
        self.rejecting.lock().unwrap().insert(address.clone());
    }

    pub fn accept(&self, address: &Address) {
        self.rejecting.lock().unwrap().remove(address);
    }

    pub fn transfers(&self) -> Vec<TransferRecord> {
        self.sent.lock().unwrap().clone()
    }

    /// Total `asset` received by `address`.
    pub fn received(&self, address: &Address, asset: AssetKind) -> u128 {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|t| &t.to == address && t.asset == asset)
            .map(|t| t.amount)
            .sum()
    }

    /// Total `asset` sent to anyone.
    pub fn total_sent(&self, asset: AssetKind) -> u128 {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.asset == asset)
            .map(|t| t.amount)
            .sum()
    }
}

impl AssetTransfer for NullTransfer {
    fn transfer_all(&self, asset: AssetKind, payouts: &[Payout]) -> Result<(), TransferError> {
        let rejecting = self.rejecting.lock().unwrap();
        if let Some(refused) = payouts.iter().find(|p| rejecting.contains(&p.to)) {
            return Err(TransferError::Rejected(refused.to.clone()));
        }
        let mut sent = self.sent.lock().unwrap();
        sent.extend(payouts.iter().map(|p| TransferRecord {
            asset,
            to: p.to.clone(),
            amount: p.amount,
        }));
        Ok(())
    }
}
