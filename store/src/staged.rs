//! Copy-on-write staging over a [`PledgeStore`].
//!
//! ```ignore
//! let mut staged = StagedStore::new(&store);
//! staged.put_stake(key, stake);
//! staged.put_pool(cohort, asset, pool);
//! staged.commit()?;
//! ```
//!
//! Reads see the staged writes layered over the base store. If the staged store
//! is dropped without calling [`StagedStore::commit`], nothing reaches the base.

use std::collections::{BTreeMap, HashMap};

use pledge_types::{Address, AssetKind, CohortId, CohortPool, KeyFingerprint, Stake, StakeKey};

use crate::{
    CohortStore, KeyRegistryStore, PledgeStore, ProofStore, SequenceStore, StakeStore,
    StoreError, WriteBatch, WriteOp,
};

pub struct StagedStore<'a, S: PledgeStore + ?Sized> {
    base: &'a S,
    batch: WriteBatch,
    stakes: BTreeMap<StakeKey, Option<Stake>>,
    keys: HashMap<KeyFingerprint, Option<Address>>,
    days: HashMap<(StakeKey, u32), bool>,
    pools: HashMap<(CohortId, AssetKind), CohortPool>,
    sequences: HashMap<Address, u64>,
}

impl<'a, S: PledgeStore + ?Sized> StagedStore<'a, S> {
    pub fn new(base: &'a S) -> Self {
        Self {
            base,
            batch: WriteBatch::new(),
            stakes: BTreeMap::new(),
            keys: HashMap::new(),
            days: HashMap::new(),
            pools: HashMap::new(),
            sequences: HashMap::new(),
        }
    }

    pub fn put_stake(&mut self, key: StakeKey, stake: Stake) {
        self.stakes.insert(key.clone(), Some(stake.clone()));
        self.batch.push(WriteOp::PutStake(key, stake));
    }

    pub fn delete_stake(&mut self, key: StakeKey) {
        self.stakes.insert(key.clone(), None);
        self.batch.push(WriteOp::DeleteStake(key));
    }

    pub fn put_key_owner(&mut self, fingerprint: KeyFingerprint, owner: Address) {
        self.keys.insert(fingerprint, Some(owner.clone()));
        self.batch.push(WriteOp::PutKeyOwner(fingerprint, owner));
    }

    pub fn delete_key_owner(&mut self, fingerprint: KeyFingerprint) {
        self.keys.insert(fingerprint, None);
        self.batch.push(WriteOp::DeleteKeyOwner(fingerprint));
    }

    pub fn mark_day_verified(&mut self, stake: StakeKey, day: u32) {
        self.days.insert((stake.clone(), day), true);
        self.batch.push(WriteOp::MarkDayVerified(stake, day));
    }

    pub fn clear_day_verified(&mut self, stake: StakeKey, day: u32) {
        self.days.insert((stake.clone(), day), false);
        self.batch.push(WriteOp::ClearDayVerified(stake, day));
    }

    pub fn put_pool(&mut self, cohort: CohortId, asset: AssetKind, pool: CohortPool) {
        self.pools.insert((cohort, asset), pool);
        self.batch.push(WriteOp::PutPool(cohort, asset, pool));
    }

    pub fn put_sequence(&mut self, owner: Address, next: u64) {
        self.sequences.insert(owner.clone(), next);
        self.batch.push(WriteOp::PutSequence(owner, next));
    }

    /// Writes staged so far.
    pub fn pending(&self) -> &WriteBatch {
        &self.batch
    }

    /// Hand every staged write to the base store as one batch.
    pub fn commit(self) -> Result<(), StoreError> {
        if self.batch.is_empty() {
            return Ok(());
        }
        self.base.apply(self.batch)
    }
}

impl<S: PledgeStore + ?Sized> StakeStore for StagedStore<'_, S> {
    fn get_stake(&self, key: &StakeKey) -> Result<Option<Stake>, StoreError> {
        match self.stakes.get(key) {
            Some(staged) => Ok(staged.clone()),
            None => self.base.get_stake(key),
        }
    }

    fn stakes_of(&self, owner: &Address) -> Result<Vec<StakeKey>, StoreError> {
        let mut keys = self.base.stakes_of(owner)?;
        keys.retain(|k| !matches!(self.stakes.get(k), Some(None)));
        for (key, staged) in self.stakes.range(StakeKey::single(owner.clone())..) {
            if &key.owner != owner {
                break;
            }
            if staged.is_some() && !keys.contains(key) {
                keys.push(key.clone());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

impl<S: PledgeStore + ?Sized> KeyRegistryStore for StagedStore<'_, S> {
    fn key_owner(&self, fingerprint: &KeyFingerprint) -> Result<Option<Address>, StoreError> {
        match self.keys.get(fingerprint) {
            Some(staged) => Ok(staged.clone()),
            None => self.base.key_owner(fingerprint),
        }
    }
}

impl<S: PledgeStore + ?Sized> ProofStore for StagedStore<'_, S> {
    fn is_day_verified(&self, stake: &StakeKey, day: u32) -> Result<bool, StoreError> {
        match self.days.get(&(stake.clone(), day)) {
            Some(staged) => Ok(*staged),
            None => self.base.is_day_verified(stake, day),
        }
    }
}

impl<S: PledgeStore + ?Sized> CohortStore for StagedStore<'_, S> {
    fn get_pool(&self, cohort: CohortId, asset: AssetKind) -> Result<CohortPool, StoreError> {
        match self.pools.get(&(cohort, asset)) {
            Some(staged) => Ok(*staged),
            None => self.base.get_pool(cohort, asset),
        }
    }
}

impl<S: PledgeStore + ?Sized> SequenceStore for StagedStore<'_, S> {
    fn next_sequence(&self, owner: &Address) -> Result<u64, StoreError> {
        match self.sequences.get(owner) {
            Some(staged) => Ok(*staged),
            None => self.base.next_sequence(owner),
        }
    }
}
