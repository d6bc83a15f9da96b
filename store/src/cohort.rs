use crate::StoreError;
use pledge_types::{AssetKind, CohortId, CohortPool};

/// Cohort accounting records.
pub trait CohortStore {
    /// The pool for `(cohort, asset)`; an all-zero record when none was ever written.
    fn get_pool(&self, cohort: CohortId, asset: AssetKind) -> Result<CohortPool, StoreError>;
}
