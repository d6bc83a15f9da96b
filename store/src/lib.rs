//! Abstract storage traits for the pledge engine.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these traits.
//! The engine depends only on the traits.
//!
//! Reads go through the per-record traits. Writes are never applied one by one:
//! callers collect them in a [`WriteBatch`] (usually via a [`StagedStore`]) and
//! hand the whole batch to [`PledgeStore::apply`], which must apply all of it or
//! none of it.

pub mod cohort;
pub mod error;
pub mod key_registry;
pub mod proof;
pub mod sequence;
pub mod stake;
pub mod staged;
pub mod write_batch;

pub use cohort::CohortStore;
pub use error::StoreError;
pub use key_registry::KeyRegistryStore;
pub use proof::ProofStore;
pub use sequence::SequenceStore;
pub use stake::StakeStore;
pub use staged::StagedStore;
pub use write_batch::{WriteBatch, WriteOp};

/// A complete backend: every read trait plus atomic batch application.
pub trait PledgeStore:
    StakeStore + KeyRegistryStore + ProofStore + CohortStore + SequenceStore
{
    /// Apply every operation in `batch`, in order, as one atomic unit.
    fn apply(&self, batch: WriteBatch) -> Result<(), StoreError>;
}
