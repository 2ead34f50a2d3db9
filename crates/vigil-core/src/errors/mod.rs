//! Error taxonomy. Each pipeline stage has its own error enum; all of
//! them convert into the top-level [`VigilError`] via `From` impls.
//! Stage failures are caught and logged at the stage boundary — only
//! orchestration defects propagate out of `handle_error`.

mod notify_error;
mod recovery_error;
mod snapshot_error;
mod storage_error;
mod vigil_error;

pub use notify_error::NotifyError;
pub use recovery_error::RecoveryError;
pub use snapshot_error::SnapshotError;
pub use storage_error::StorageError;
pub use vigil_error::{VigilError, VigilResult};
