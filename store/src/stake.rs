use crate::StoreError;
use pledge_types::{Address, Stake, StakeKey};

/// Open stakes, keyed by owner and optional sequence.
pub trait StakeStore {
    /// The stake stored under `key`, if any.
    fn get_stake(&self, key: &StakeKey) -> Result<Option<Stake>, StoreError>;

    /// Keys of every stake currently stored for `owner`, in ascending order.
    fn stakes_of(&self, owner: &Address) -> Result<Vec<StakeKey>, StoreError>;
}
