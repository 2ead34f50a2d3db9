//! RecoveryRecord — state machine for automated recovery of one error.

use serde::{Deserialize, Serialize};

use super::{Category, Fingerprint};

/// `Tracked → Attempting → {Recovered | Tracked (retry) | Exhausted}`.
/// `Recovered` and `Exhausted` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryState {
    Tracked,
    Attempting,
    Recovered,
    Exhausted,
}

impl RecoveryState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Recovered | Self::Exhausted)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryRecord {
    pub id: String,
    pub error_id: String,
    pub fingerprint: Fingerprint,
    pub category: Category,
    /// Strategy attempts so far, never exceeds the configured maximum.
    pub attempts: u32,
    /// Epoch millis of the most recent attempt.
    pub last_attempt: Option<u64>,
    pub state: RecoveryState,
    /// Winning strategy name, set on success.
    pub strategy: Option<String>,
    /// Epoch millis when tracking started.
    pub tracked_at: u64,
    /// Epoch millis when the record reached a terminal state.
    pub completed_at: Option<u64>,
}

impl RecoveryRecord {
    pub fn recovered(&self) -> bool {
        self.state == RecoveryState::Recovered
    }

    /// Wall time from tracking to recovery, for recovered records.
    pub fn recovery_duration(&self) -> Option<u64> {
        match (self.state, self.completed_at) {
            (RecoveryState::Recovered, Some(done)) => Some(done.saturating_sub(self.tracked_at)),
            _ => None,
        }
    }
}
