//! # vigil-core
//!
//! Foundation crate for the Vigil error observability pipeline.
//! Defines the data model, error taxonomy, configuration, capability
//! traits for external collaborators, and the clock/timer abstraction.
//! Every other crate in the workspace depends on this.

pub mod clock;
pub mod config;
pub mod errors;
pub mod ids;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use clock::{Clock, ManualClock, SystemClock, TimerSet};
pub use config::VigilConfig;
pub use errors::{VigilError, VigilResult};
pub use models::{Category, ErrorRecord, Fingerprint, Severity};

/// HashMap/HashSet aliases used across the workspace.
pub type FxHashMap<K, V> = rustc_hash::FxHashMap<K, V>;
pub type FxHashSet<T> = rustc_hash::FxHashSet<T>;
