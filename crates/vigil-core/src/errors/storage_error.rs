//! Storage-layer errors for the key-value capability.

/// Errors that can occur when persisting through the key-value store.
/// `QuotaExceeded` is the non-fatal condition the pipeline must absorb.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage quota exceeded: needed {needed} bytes, limit {limit}")]
    QuotaExceeded { needed: usize, limit: usize },

    #[error("write failed for key {key}: {message}")]
    WriteFailed { key: String, message: String },

    #[error("read failed for key {key}: {message}")]
    ReadFailed { key: String, message: String },

    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

impl StorageError {
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. })
    }
}
