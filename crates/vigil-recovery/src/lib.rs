//! Automatic error recovery.
//!
//! Errors worth recovering are tracked as [`RecoveryRecord`]s and run
//! through a registry of [`RecoveryStrategy`] trait objects: candidates
//! are picked by trigger match, ordered by priority and historical
//! effectiveness, and retried up to a bounded attempt budget with
//! per-strategy cooldowns.

pub mod strategies;
pub mod tracker;

pub use strategies::{
    CacheClear, CanvasReset, RecoveryContext, RecoveryStrategy, SceneReload, StrategyRegistry,
};
pub use tracker::{CancelFlag, RecoveryReport, RecoveryStats, RecoveryTracker, StrategyStats};

pub use vigil_core::models::RecoveryRecord;
