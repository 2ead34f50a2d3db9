use super::{NotifyError, RecoveryError, SnapshotError, StorageError};

/// Top-level error type for the Vigil pipeline.
/// All stage errors convert into this via `From` impls.
#[derive(Debug, thiserror::Error)]
pub enum VigilError {
    #[error("error record not found: {id}")]
    RecordNotFound { id: String },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("notification error: {0}")]
    Notify(#[from] NotifyError),

    #[error("recovery error: {0}")]
    Recovery(#[from] RecoveryError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),
}

/// Convenience type alias.
pub type VigilResult<T> = Result<T, VigilError>;
