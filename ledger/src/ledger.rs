//! The stake ledger: the only component that writes stake records.
//!
//! Reads go against any store; writes always land in a [`StagedStore`] so the
//! caller decides when (and whether) they reach the backend.

use pledge_store::{PledgeStore, SequenceStore, StagedStore, StakeStore};
use pledge_types::{Address, EconomicParams, Stake, StakeKey, StakeMode, Timestamp};
use tracing::debug;

use crate::entry::{new_stake, validate_entry, OpenStake};
use crate::error::LedgerError;

/// Stake records addressed according to the deployment's [`StakeMode`].
#[derive(Clone, Debug)]
pub struct StakeLedger {
    mode: StakeMode,
    params: EconomicParams,
}

impl StakeLedger {
    pub fn new(mode: StakeMode, params: EconomicParams) -> Self {
        Self { mode, params }
    }

    pub fn mode(&self) -> StakeMode {
        self.mode
    }

    pub fn params(&self) -> &EconomicParams {
        &self.params
    }

    /// Ledger key for `owner` and an optional sequence.
    ///
    /// Single mode has no sequences and multi mode requires one; a mismatch
    /// can never address a stake and reports `NotFound`.
    pub fn key(&self, owner: &Address, sequence: Option<u64>) -> Result<StakeKey, LedgerError> {
        match (self.mode, sequence) {
            (StakeMode::Single, None) => Ok(StakeKey::single(owner.clone())),
            (StakeMode::Multi, Some(seq)) => Ok(StakeKey::multi(owner.clone(), seq)),
            (_, sequence) => Err(LedgerError::NotFound(StakeKey {
                owner: owner.clone(),
                sequence,
            })),
        }
    }

    /// Key the owner's next stake will be stored under.
    pub fn next_key<S>(&self, store: &S, owner: &Address) -> Result<StakeKey, LedgerError>
    where
        S: StakeStore + SequenceStore + ?Sized,
    {
        match self.mode {
            StakeMode::Single => {
                let key = StakeKey::single(owner.clone());
                match store.get_stake(&key)? {
                    Some(existing) if existing.is_open() => Err(LedgerError::AlreadyStaked(key)),
                    _ => Ok(key),
                }
            }
            StakeMode::Multi => Ok(StakeKey::multi(
                owner.clone(),
                store.next_sequence(owner)?,
            )),
        }
    }

    /// Validate `request` and stage the new stake record.
    ///
    /// Only the stake itself (and the owner's sequence counter in multi mode)
    /// is written here; key binding and cohort counters belong to their owners.
    pub fn open<S: PledgeStore + ?Sized>(
        &self,
        staged: &mut StagedStore<'_, S>,
        owner: &Address,
        request: &OpenStake,
        now: Timestamp,
    ) -> Result<(StakeKey, Stake), LedgerError> {
        validate_entry(&self.params, request)?;
        let key = self.next_key(&*staged, owner)?;
        if let Some(seq) = key.sequence {
            let next = seq.checked_add(1).ok_or(LedgerError::Overflow)?;
            staged.put_sequence(owner.clone(), next);
        }
        let stake = new_stake(&self.params, request, now);
        staged.put_stake(key.clone(), stake.clone());
        Ok((key, stake))
    }

    /// The open stake at `key`.
    pub fn load_open<S>(&self, store: &S, key: &StakeKey) -> Result<Stake, LedgerError>
    where
        S: StakeStore + ?Sized,
    {
        match store.get_stake(key)? {
            Some(stake) if stake.amount == 0 => Err(LedgerError::NotFound(key.clone())),
            Some(stake) if stake.settled => Err(LedgerError::AlreadySettled(key.clone())),
            Some(stake) => Ok(stake),
            None => Err(LedgerError::NotFound(key.clone())),
        }
    }

    /// Keys of the owner's open stakes, ascending.
    pub fn open_stakes<S>(&self, store: &S, owner: &Address) -> Result<Vec<StakeKey>, LedgerError>
    where
        S: StakeStore + ?Sized,
    {
        let mut open = Vec::new();
        for key in store.stakes_of(owner)? {
            if matches!(store.get_stake(&key)?, Some(stake) if stake.is_open()) {
                open.push(key);
            }
        }
        Ok(open)
    }

    /// Stage an accepted proof: the day slot is consumed either way, the
    /// success counter moves only for an achieved day.
    pub fn record_proof<S: PledgeStore + ?Sized>(
        &self,
        staged: &mut StagedStore<'_, S>,
        key: &StakeKey,
        mut stake: Stake,
        day: u32,
        achieved: bool,
    ) -> Result<Stake, LedgerError> {
        if achieved {
            stake.successful_days = stake
                .successful_days
                .checked_add(1)
                .ok_or(LedgerError::Overflow)?;
        }
        staged.mark_day_verified(key.clone(), day);
        staged.put_stake(key.clone(), stake.clone());
        debug!(stake = %key, day, achieved, successful = stake.successful_days, "day recorded");
        Ok(stake)
    }

    /// Stage removal of a settled stake and every one of its day flags.
    pub fn clear<S: PledgeStore + ?Sized>(
        &self,
        staged: &mut StagedStore<'_, S>,
        key: &StakeKey,
        stake: &Stake,
    ) {
        staged.delete_stake(key.clone());
        for day in 0..stake.duration_days {
            staged.clear_day_verified(key.clone(), day);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_shape_follows_mode() {
        let owner = Address::new("alice");
        let single = StakeLedger::new(StakeMode::Single, EconomicParams::default());
        let multi = StakeLedger::new(StakeMode::Multi, EconomicParams::default());

        assert_eq!(
            single.key(&owner, None).unwrap(),
            StakeKey::single(owner.clone())
        );
        assert_eq!(
            multi.key(&owner, Some(4)).unwrap(),
            StakeKey::multi(owner.clone(), 4)
        );
        assert!(matches!(
            single.key(&owner, Some(0)),
            Err(LedgerError::NotFound(_))
        ));
        assert!(matches!(
            multi.key(&owner, None),
            Err(LedgerError::NotFound(_))
        ));
    }
}
