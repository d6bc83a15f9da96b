//! Nullable store: thread-safe in-memory storage for testing.

use pledge_store::{
    CohortStore, KeyRegistryStore, PledgeStore, ProofStore, SequenceStore, StakeStore,
    StoreError, WriteBatch, WriteOp,
};
use pledge_types::{Address, AssetKind, CohortId, CohortPool, KeyFingerprint, Stake, StakeKey};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
struct State {
    stakes: BTreeMap<StakeKey, Stake>,
    keys: HashMap<KeyFingerprint, Address>,
    days: HashSet<(StakeKey, u32)>,
    pools: HashMap<(CohortId, AssetKind), CohortPool>,
    sequences: HashMap<Address, u64>,
}

/// An in-memory [`PledgeStore`] for testing.
///
/// Batches are applied under one lock, so readers never see half a batch.
/// [`NullStore::fail_writes`] makes every `apply` fail, to exercise the
/// engine's behaviour when the backend refuses a commit.
#[derive(Default)]
pub struct NullStore {
    state: Mutex<State>,
    fail_writes: AtomicBool,
    batches: AtomicUsize,
}

impl NullStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of batches successfully applied.
    pub fn batches_applied(&self) -> usize {
        self.batches.load(Ordering::SeqCst)
    }

    /// Stored stake records, open or not.
    pub fn stake_count(&self) -> usize {
        self.state.lock().unwrap().stakes.len()
    }

    pub fn key_count(&self) -> usize {
        self.state.lock().unwrap().keys.len()
    }

    /// Verified-day flags currently set across all stakes.
    pub fn verified_day_count(&self) -> usize {
        self.state.lock().unwrap().days.len()
    }

    /// Write a stake record directly, bypassing the engine.
    pub fn insert_stake(&self, key: StakeKey, stake: Stake) {
        self.state.lock().unwrap().stakes.insert(key, stake);
    }
}

impl StakeStore for NullStore {
    fn get_stake(&self, key: &StakeKey) -> Result<Option<Stake>, StoreError> {
        Ok(self.state.lock().unwrap().stakes.get(key).cloned())
    }

    fn stakes_of(&self, owner: &Address) -> Result<Vec<StakeKey>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .stakes
            .range(StakeKey::single(owner.clone())..)
            .take_while(|(key, _)| &key.owner == owner)
            .map(|(key, _)| key.clone())
            .collect())
    }
}

impl KeyRegistryStore for NullStore {
    fn key_owner(&self, fingerprint: &KeyFingerprint) -> Result<Option<Address>, StoreError> {
        Ok(self.state.lock().unwrap().keys.get(fingerprint).cloned())
    }
}

impl ProofStore for NullStore {
    fn is_day_verified(&self, stake: &StakeKey, day: u32) -> Result<bool, StoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .days
            .contains(&(stake.clone(), day)))
    }
}

impl CohortStore for NullStore {
    fn get_pool(&self, cohort: CohortId, asset: AssetKind) -> Result<CohortPool, StoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .pools
            .get(&(cohort, asset))
            .copied()
            .unwrap_or_default())
    }
}

impl SequenceStore for NullStore {
    fn next_sequence(&self, owner: &Address) -> Result<u64, StoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .sequences
            .get(owner)
            .copied()
            .unwrap_or(0))
    }
}

impl PledgeStore for NullStore {
    fn apply(&self, batch: WriteBatch) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("writes disabled".into()));
        }
        let mut state = self.state.lock().unwrap();
        for op in batch.into_ops() {
            match op {
                WriteOp::PutStake(key, stake) => {
                    state.stakes.insert(key, stake);
                }
                WriteOp::DeleteStake(key) => {
                    state.stakes.remove(&key);
                }
                WriteOp::PutKeyOwner(fingerprint, owner) => {
                    state.keys.insert(fingerprint, owner);
                }
                WriteOp::DeleteKeyOwner(fingerprint) => {
                    state.keys.remove(&fingerprint);
                }
                WriteOp::MarkDayVerified(key, day) => {
                    state.days.insert((key, day));
                }
                WriteOp::ClearDayVerified(key, day) => {
                    state.days.remove(&(key, day));
                }
                WriteOp::PutPool(cohort, asset, pool) if pool.is_empty() => {
                    state.pools.remove(&(cohort, asset));
                }
                WriteOp::PutPool(cohort, asset, pool) => {
                    state.pools.insert((cohort, asset), pool);
                }
                WriteOp::PutSequence(owner, next) => {
                    state.sequences.insert(owner, next);
                }
            }
        }
        self.batches.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
