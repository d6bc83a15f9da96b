//! Settlement of pooled commitment stakes.
//!
//! [`PledgeEngine`] ties the pieces together:
//!
//! - the stake ledger (`pledge-ledger`) owns stake records
//! - the [`key_registry`] keeps one owner per public key
//! - [`proof_window`] decides which daily attestations are acceptable
//! - the cohort engine (`pledge-cohort`) does the pool accounting
//!
//! Transfers, signature checks and payout configuration are injected
//! collaborators ([`AssetTransfer`], [`AttestationVerifier`](pledge_crypto::AttestationVerifier),
//! [`SettlementConfig`]).

pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod key_registry;
pub mod proof_window;
pub mod transfer;

pub use config::{PledgeConfig, SettlementConfig};
pub use engine::{PledgeEngine, PoolSnapshot, SettlementReceipt};
pub use error::SettlementError;
pub use events::{EventBus, PledgeEvent};
pub use proof_window::DayStatus;
pub use transfer::{AssetTransfer, Payout, TransferError};
