//! LMDB environment setup and the `PledgeStore` implementation.

use std::ops::Bound;
use std::path::Path;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions, RoTxn, RwTxn};
use serde::de::DeserializeOwned;

use pledge_store::{
    CohortStore, KeyRegistryStore, PledgeStore, ProofStore, SequenceStore, StakeStore,
    StoreError, WriteBatch, WriteOp,
};
use pledge_types::{Address, AssetKind, CohortId, CohortPool, KeyFingerprint, Stake, StakeKey};

use crate::keys::{day_key, decode_stake_key, increment_prefix, owner_prefix, pool_key, stake_key};
use crate::LmdbError;

/// Names of every database in a pledge environment.
pub const DATABASES: &[&str] = &["stakes", "key_owners", "verified_days", "pools", "sequences"];

/// Default map size: 1 GiB.
pub const DEFAULT_MAP_SIZE: usize = 1 << 30;

/// Wraps the LMDB environment and all database handles.
#[derive(Debug)]
pub struct LmdbEnvironment {
    env: Env,
    stakes_db: Database<Bytes, Bytes>,
    key_owners_db: Database<Bytes, Bytes>,
    verified_days_db: Database<Bytes, Bytes>,
    pools_db: Database<Bytes, Bytes>,
    sequences_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;
        // SAFETY: the environment is opened once per path by this process and
        // the backing file is not modified by anything outside LMDB.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(DATABASES.len() as u32)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let stakes_db = env.create_database(&mut wtxn, Some("stakes"))?;
        let key_owners_db = env.create_database(&mut wtxn, Some("key_owners"))?;
        let verified_days_db = env.create_database(&mut wtxn, Some("verified_days"))?;
        let pools_db = env.create_database(&mut wtxn, Some("pools"))?;
        let sequences_db = env.create_database(&mut wtxn, Some("sequences"))?;
        wtxn.commit()?;

        tracing::debug!(path = %path.display(), "opened pledge LMDB environment");

        Ok(Self {
            env,
            stakes_db,
            key_owners_db,
            verified_days_db,
            pools_db,
            sequences_db,
        })
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    fn read<T: DeserializeOwned>(
        &self,
        db: &Database<Bytes, Bytes>,
        key: &[u8],
    ) -> Result<Option<T>, LmdbError> {
        let rtxn = self.env.read_txn()?;
        Self::read_in(&rtxn, db, key)
    }

    fn read_in<T: DeserializeOwned>(
        txn: &RoTxn,
        db: &Database<Bytes, Bytes>,
        key: &[u8],
    ) -> Result<Option<T>, LmdbError> {
        match db.get(txn, key)? {
            Some(bytes) => Ok(Some(bincode::deserialize(bytes)?)),
            None => Ok(None),
        }
    }

    fn apply_op(&self, wtxn: &mut RwTxn, op: WriteOp) -> Result<(), LmdbError> {
        match op {
            WriteOp::PutStake(key, stake) => {
                let bytes = bincode::serialize(&stake)?;
                self.stakes_db.put(wtxn, &stake_key(&key), &bytes)?;
            }
            WriteOp::DeleteStake(key) => {
                self.stakes_db.delete(wtxn, &stake_key(&key))?;
            }
            WriteOp::PutKeyOwner(fingerprint, owner) => {
                let bytes = bincode::serialize(&owner)?;
                self.key_owners_db.put(wtxn, fingerprint.as_bytes(), &bytes)?;
            }
            WriteOp::DeleteKeyOwner(fingerprint) => {
                self.key_owners_db.delete(wtxn, fingerprint.as_bytes())?;
            }
            WriteOp::MarkDayVerified(stake, day) => {
                self.verified_days_db.put(wtxn, &day_key(&stake, day), &[1u8])?;
            }
            WriteOp::ClearDayVerified(stake, day) => {
                self.verified_days_db.delete(wtxn, &day_key(&stake, day))?;
            }
            WriteOp::PutPool(cohort, asset, pool) => {
                let key = pool_key(cohort, asset);
                if pool.is_empty() {
                    self.pools_db.delete(wtxn, &key)?;
                } else {
                    let bytes = bincode::serialize(&pool)?;
                    self.pools_db.put(wtxn, &key, &bytes)?;
                }
            }
            WriteOp::PutSequence(owner, next) => {
                self.sequences_db
                    .put(wtxn, owner.as_bytes(), &next.to_be_bytes())?;
            }
        }
        Ok(())
    }
}

impl StakeStore for LmdbEnvironment {
    fn get_stake(&self, key: &StakeKey) -> Result<Option<Stake>, StoreError> {
        Ok(self.read(&self.stakes_db, &stake_key(key))?)
    }

    fn stakes_of(&self, owner: &Address) -> Result<Vec<StakeKey>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let prefix = owner_prefix(owner);
        let mut upper = prefix.clone();
        let upper_bound = if increment_prefix(&mut upper) {
            Bound::Excluded(upper.as_slice())
        } else {
            Bound::Unbounded
        };
        let bounds = (Bound::Included(prefix.as_slice()), upper_bound);
        let iter = self
            .stakes_db
            .range(&rtxn, &bounds)
            .map_err(LmdbError::from)?;
        let mut keys = Vec::new();
        for item in iter {
            let (raw, _) = item.map_err(LmdbError::from)?;
            keys.push(decode_stake_key(owner, raw)?);
        }
        Ok(keys)
    }
}

impl KeyRegistryStore for LmdbEnvironment {
    fn key_owner(&self, fingerprint: &KeyFingerprint) -> Result<Option<Address>, StoreError> {
        Ok(self.read(&self.key_owners_db, fingerprint.as_bytes())?)
    }
}

impl ProofStore for LmdbEnvironment {
    fn is_day_verified(&self, stake: &StakeKey, day: u32) -> Result<bool, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let found = self
            .verified_days_db
            .get(&rtxn, &day_key(stake, day))
            .map_err(LmdbError::from)?;
        Ok(found.is_some())
    }
}

impl CohortStore for LmdbEnvironment {
    fn get_pool(&self, cohort: CohortId, asset: AssetKind) -> Result<CohortPool, StoreError> {
        let pool: Option<CohortPool> = self.read(&self.pools_db, &pool_key(cohort, asset))?;
        Ok(pool.unwrap_or_default())
    }
}

impl SequenceStore for LmdbEnvironment {
    fn next_sequence(&self, owner: &Address) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let raw = self
            .sequences_db
            .get(&rtxn, owner.as_bytes())
            .map_err(LmdbError::from)?;
        match raw {
            None => Ok(0),
            Some(bytes) => {
                let arr: [u8; 8] = bytes.try_into().map_err(|_| {
                    StoreError::Corruption(format!("sequence for {owner} is {} bytes", bytes.len()))
                })?;
                Ok(u64::from_be_bytes(arr))
            }
        }
    }
}

impl PledgeStore for LmdbEnvironment {
    fn apply(&self, batch: WriteBatch) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let count = batch.len();
        for op in batch.into_ops() {
            // an early return drops `wtxn`, which aborts the transaction
            self.apply_op(&mut wtxn, op)?;
        }
        wtxn.commit().map_err(LmdbError::from)?;
        tracing::trace!(ops = count, "applied write batch");
        Ok(())
    }
}
