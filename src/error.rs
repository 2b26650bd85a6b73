use thiserror::Error;

pub type Result<T> = std::result::Result<T, EscrowError>;

#[derive(Error, Debug)]
pub enum EscrowError {
    /// Business-rule violation. Recoverable by the caller; maps to a
    /// 400-class response at the API boundary.
    #[error("{0}")]
    Rejected(String),
    /// Ownership violation (e.g. withdrawing someone else's payout);
    /// maps to 403.
    #[error("{0}")]
    Forbidden(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("storage error: {0}")]
    Storage(#[from] rocksdb::Error),
    /// Persistence-layer fault that is not one of the typed variants above.
    /// Propagates unmodified to the caller's transaction management.
    #[error("internal error: {0}")]
    Internal(Box<dyn std::error::Error + Send + Sync>),
}

impl EscrowError {
    /// True for errors the caller can recover from by correcting input or
    /// waiting for a valid state.
    pub fn is_business_error(&self) -> bool {
        matches!(self, Self::Rejected(_) | Self::Forbidden(_))
    }
}
