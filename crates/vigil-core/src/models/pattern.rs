//! ErrorPattern — aggregate statistics for all errors sharing a
//! fingerprint. One pattern per fingerprint, enforced by the analyzer.

use serde::{Deserialize, Serialize};

use super::Fingerprint;

/// Occurrence-rate direction over the trend window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Increasing,
    Stable,
    Decreasing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPattern {
    pub fingerprint: Fingerprint,
    /// Monotonic non-decreasing occurrence count.
    pub count: u64,
    /// Epoch millis of the first and most recent occurrence.
    pub first_seen: u64,
    pub last_seen: u64,
    pub trend: Trend,
    /// Contributing error ids in arrival order.
    pub error_ids: Vec<String>,
}

impl ErrorPattern {
    pub fn new(fingerprint: Fingerprint, timestamp: u64) -> Self {
        Self {
            fingerprint,
            count: 0,
            first_seen: timestamp,
            last_seen: timestamp,
            trend: Trend::Stable,
            error_ids: Vec::new(),
        }
    }
}
