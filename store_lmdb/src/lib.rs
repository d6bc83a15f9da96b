//! LMDB storage backend for the pledge engine.
//!
//! Implements every storage trait from `pledge-store` using the `heed` LMDB
//! bindings. Each record family maps to one LMDB database within a single
//! environment, and each [`WriteBatch`](pledge_store::WriteBatch) is applied
//! inside one LMDB write transaction.

pub mod environment;
pub mod error;
pub mod integrity;
pub mod keys;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use integrity::{check_data_dir, check_integrity, IntegrityReport};
