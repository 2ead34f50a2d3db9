//! Configuration for every pipeline subsystem. All structs are
//! serde-deserializable with `#[serde(default)]` so partial TOML/JSON
//! configs work; `effective_*()` accessors supply the defaults.

mod analysis_config;
mod classify_config;
mod notify_config;
mod recovery_config;
mod snapshot_config;
mod storage_config;

pub use analysis_config::AnalysisConfig;
pub use classify_config::ClassifyConfig;
pub use notify_config::{
    AggregationConfig, ChannelConfig, ChannelLevel, ChannelsConfig, NotifyConfig,
    RateLimitConfig, ThresholdConfig,
};
pub use recovery_config::RecoveryConfig;
pub use snapshot_config::SnapshotConfig;
pub use storage_config::StorageConfig;

use serde::{Deserialize, Serialize};

use crate::errors::VigilError;

/// Root configuration for the whole pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VigilConfig {
    pub analysis: AnalysisConfig,
    pub classify: ClassifyConfig,
    pub storage: StorageConfig,
    pub notify: NotifyConfig,
    pub snapshot: SnapshotConfig,
    pub recovery: RecoveryConfig,
}

impl VigilConfig {
    /// Parse from a TOML document. Unknown keys are ignored.
    pub fn from_toml_str(s: &str) -> Result<Self, VigilError> {
        toml::from_str(s).map_err(|e| VigilError::Config(e.to_string()))
    }
}
