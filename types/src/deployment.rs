//! Deployment identity bound into every signed attestation.

use serde::{Deserialize, Serialize};

use crate::Address;

/// Identifies one deployment of the engine.
///
/// Attestations signed for one deployment are rejected by every other, even when
/// the same key and owner are reused across chains or contract instances.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Deployment {
    /// Host chain identifier.
    pub chain_id: u64,
    /// Address of the contract instance holding the escrow.
    pub contract: Address,
}

impl Deployment {
    pub fn new(chain_id: u64, contract: Address) -> Self {
        Self { chain_id, contract }
    }
}
