//! Snapshot capture configuration.

use serde::{Deserialize, Serialize};

use crate::models::Severity;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Default: true.
    pub enabled: Option<bool>,
    /// Minimum severity that triggers capture. Default: High.
    pub capture_threshold: Option<Severity>,
    /// Bounded snapshot cache length. Default: 20.
    pub max_snapshots: Option<usize>,
    /// Total cache byte quota. Default: 5 MB.
    pub max_storage_bytes: Option<usize>,
    /// Individual snapshots larger than this are rejected. Default: 1 MB.
    pub max_single_bytes: Option<usize>,
    /// Snapshots older than this are dropped by `clear_old`. Default: 24 h.
    pub max_age_ms: Option<u64>,
}

impl SnapshotConfig {
    pub fn effective_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    pub fn effective_capture_threshold(&self) -> Severity {
        self.capture_threshold.unwrap_or(Severity::High)
    }

    pub fn effective_max_snapshots(&self) -> usize {
        self.max_snapshots.unwrap_or(20)
    }

    pub fn effective_max_storage_bytes(&self) -> usize {
        self.max_storage_bytes.unwrap_or(5 * 1024 * 1024)
    }

    pub fn effective_max_single_bytes(&self) -> usize {
        self.max_single_bytes.unwrap_or(1024 * 1024)
    }

    pub fn effective_max_age_ms(&self) -> u64 {
        self.max_age_ms.unwrap_or(24 * 60 * 60 * 1000)
    }
}
