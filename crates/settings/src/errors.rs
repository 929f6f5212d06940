use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("quota exceeded while storing {needed} bytes")]
    QuotaExceeded { needed: usize },

    #[error("store unavailable: {0:?}")]
    Unavailable(crate::source::StoreKind),

    #[error("other: {0}")]
    Other(String),
}

impl StoreError {
    /// True for the one failure the caller may recover from by freeing space.
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, StoreError::QuotaExceeded { .. })
    }
}
