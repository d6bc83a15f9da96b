//! Nullable infrastructure for deterministic testing.
//!
//! Every collaborator the settlement engine consumes (storage, asset
//! transfers, signature checks, event observers) has a test-friendly
//! implementation here that:
//! - Behaves deterministically
//! - Can be steered programmatically (reject a recipient, fail writes)
//! - Records what happened so tests can assert on it
//! - Never touches the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod events;
pub mod store;
pub mod transfer;
pub mod verifier;

pub use clock::NullClock;
pub use events::EventRecorder;
pub use store::NullStore;
pub use transfer::{NullTransfer, TransferRecord};
pub use verifier::NullVerifier;
