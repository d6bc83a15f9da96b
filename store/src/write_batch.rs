//! Write batching: the unit of atomicity for every engine call.
//!
//! A batch is an ordered list of record writes. Backends apply a batch inside a
//! single transaction (LMDB) or under a single lock (in-memory), so either every
//! operation lands or none does.

use pledge_types::{Address, AssetKind, CohortId, CohortPool, KeyFingerprint, Stake, StakeKey};

/// One record write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WriteOp {
    PutStake(StakeKey, Stake),
    DeleteStake(StakeKey),
    PutKeyOwner(KeyFingerprint, Address),
    DeleteKeyOwner(KeyFingerprint),
    MarkDayVerified(StakeKey, u32),
    ClearDayVerified(StakeKey, u32),
    PutPool(CohortId, AssetKind, CohortPool),
    PutSequence(Address, u64),
}

/// An ordered group of writes applied atomically.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: WriteOp) {
        self.ops.push(op);
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }
}
