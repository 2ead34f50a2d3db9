//! Collector and analyzer configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Maximum collected errors held in memory. Default: 1000.
    pub max_errors: Option<usize>,
    /// Window for trend recomputation in millis. Default: 5 minutes.
    pub trend_window_ms: Option<u64>,
    /// Patterns with `last_seen` older than this are dropped by cleanup.
    /// Default: 1 hour.
    pub pattern_max_age_ms: Option<u64>,
}

impl AnalysisConfig {
    pub fn effective_max_errors(&self) -> usize {
        self.max_errors.unwrap_or(1000)
    }

    pub fn effective_trend_window_ms(&self) -> u64 {
        self.trend_window_ms.unwrap_or(5 * 60 * 1000)
    }

    pub fn effective_pattern_max_age_ms(&self) -> u64 {
        self.pattern_max_age_ms.unwrap_or(60 * 60 * 1000)
    }
}
