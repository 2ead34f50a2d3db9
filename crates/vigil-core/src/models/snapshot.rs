//! Snapshot — an encoded visual capture taken on high-severity errors.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: String,
    /// Epoch milliseconds.
    pub timestamp: u64,
    /// Encoded payload from the renderable-surface capability.
    pub payload: String,
    /// Estimated byte size of the payload.
    pub size_bytes: usize,
    pub error_id: String,
    pub error_message: String,
}

/// Filter for snapshot retrieval. Empty filter matches everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotFilter {
    pub error_id: Option<String>,
    /// Only snapshots with `timestamp >= since` (epoch millis).
    pub since: Option<u64>,
}

impl SnapshotFilter {
    pub fn matches(&self, snapshot: &Snapshot) -> bool {
        if let Some(error_id) = &self.error_id {
            if &snapshot.error_id != error_id {
                return false;
            }
        }
        if let Some(since) = self.since {
            if snapshot.timestamp < since {
                return false;
            }
        }
        true
    }
}
