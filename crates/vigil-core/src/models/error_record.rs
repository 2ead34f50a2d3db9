//! ErrorRecord — the enriched form of a runtime error, plus the filter
//! used for history retrieval and the runtime-state context snapshot.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::{Category, Fingerprint, Severity};

/// A single collected error. Immutable once created except for the
/// `acknowledged` flag and the back-reference set on successful recovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub id: String,
    pub message: String,
    pub stack: Option<String>,
    pub severity: Severity,
    pub category: Category,
    pub fingerprint: Fingerprint,
    /// Epoch milliseconds.
    pub timestamp: u64,
    pub session_id: String,
    /// Arbitrary caller-supplied context, enriched with `game_state`.
    #[serde(default)]
    pub context: FxHashMap<String, serde_json::Value>,
    /// Reference into the snapshot cache, set when capture succeeded.
    pub snapshot_id: Option<String>,
    #[serde(default)]
    pub acknowledged: bool,
    /// Name of the strategy that recovered this error, if any.
    pub recovered_by: Option<String>,
}

impl ErrorRecord {
    /// Context value lookup, tolerant of missing keys.
    pub fn context_str(&self, key: &str) -> Option<&str> {
        self.context.get(key).and_then(|v| v.as_str())
    }

    /// Whether the context carries an explicit truthy flag.
    pub fn context_flag(&self, key: &str) -> bool {
        self.context
            .get(key)
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }
}

/// Filter for error history retrieval. Empty filter matches everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorFilter {
    pub severity: Option<Severity>,
    pub category: Option<Category>,
    /// Only errors with `timestamp >= since` (epoch millis).
    pub since: Option<u64>,
}

impl ErrorFilter {
    pub fn matches(&self, record: &ErrorRecord) -> bool {
        if let Some(sev) = self.severity {
            if record.severity != sev {
                return false;
            }
        }
        if let Some(cat) = self.category {
            if record.category != cat {
                return false;
            }
        }
        if let Some(since) = self.since {
            if record.timestamp < since {
                return false;
            }
        }
        true
    }
}

/// Point-in-time snapshot of external runtime state, captured into the
/// error context at ingestion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeState {
    pub scene: Option<String>,
    pub entity_count: u32,
    pub score: u64,
    pub running: bool,
    pub paused: bool,
}
