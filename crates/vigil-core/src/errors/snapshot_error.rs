//! Snapshot-capture errors. All of them degrade to "no snapshot".

/// Errors from the renderable-surface capability or the snapshot cache.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("renderable surface unavailable")]
    Unavailable,

    #[error("capture failed: {message}")]
    CaptureFailed { message: String },

    #[error("snapshot too large: {size} bytes exceeds limit {limit}")]
    TooLarge { size: usize, limit: usize },
}
