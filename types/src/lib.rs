//! Fundamental types for the pledge settlement engine.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! addresses, timestamps, keys, asset kinds, stake and cohort records, and the
//! economic parameters that govern settlement.

pub mod address;
pub mod amount;
pub mod deployment;
pub mod error;
pub mod keys;
pub mod params;
pub mod stake;
pub mod time;

pub use address::Address;
pub use amount::{AssetKind, UNIT};
pub use deployment::Deployment;
pub use error::ParamsError;
pub use keys::{KeyFingerprint, KeyPair, PrivateKey, PublicKey, Signature};
pub use params::{Distribution, EconomicParams, StakeMode, SweepSplit};
pub use stake::{CohortId, CohortPool, Stake, StakeKey};
pub use time::Timestamp;
