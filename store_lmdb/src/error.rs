use thiserror::Error;

#[derive(Debug, Error)]
pub enum LmdbError {
    #[error("LMDB error: {0}")]
    Heed(#[from] heed::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("malformed key in {db}: {reason}")]
    MalformedKey { db: &'static str, reason: String },
}

impl From<LmdbError> for pledge_store::StoreError {
    fn from(e: LmdbError) -> Self {
        match e {
            LmdbError::Serialization(e) => pledge_store::StoreError::Serialization(e.to_string()),
            LmdbError::MalformedKey { .. } => pledge_store::StoreError::Corruption(e.to_string()),
            other => pledge_store::StoreError::Backend(other.to_string()),
        }
    }
}
