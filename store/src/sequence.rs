use crate::StoreError;
use pledge_types::Address;

/// Per-owner stake counters for multi-stake addressing.
pub trait SequenceStore {
    /// Sequence the owner's next stake will receive (0 for a new owner).
    fn next_sequence(&self, owner: &Address) -> Result<u64, StoreError>;
}
