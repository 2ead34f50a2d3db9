//! NotificationRecord and the dispatch channel enumeration.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Category, Fingerprint, Severity};

/// A notification dispatch target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Console,
    Ui,
    Storage,
    Webhook,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Console => "console",
            Self::Ui => "ui",
            Self::Storage => "storage",
            Self::Webhook => "webhook",
        };
        f.write_str(s)
    }
}

/// An issued (or queued) notification. For aggregated notifications the
/// error fields describe the group and `aggregated` carries the members.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub id: String,
    /// Epoch milliseconds.
    pub timestamp: u64,
    /// Triggering error id. None for aggregated groups.
    pub error_id: Option<String>,
    pub message: String,
    pub severity: Severity,
    pub category: Category,
    pub fingerprint: Option<Fingerprint>,
    /// Pattern occurrence count at dispatch time.
    pub occurrence_count: u64,
    /// Channels the notification was delivered to.
    pub channels: Vec<Channel>,
    #[serde(default)]
    pub acknowledged: bool,
    pub aggregated: Option<AggregatedInfo>,
}

impl NotificationRecord {
    pub fn is_aggregated(&self) -> bool {
        self.aggregated.is_some()
    }
}

/// Group metadata for an aggregated notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedInfo {
    pub count: u64,
    pub first_seen: u64,
    pub last_seen: u64,
    pub error_ids: Vec<String>,
    /// Distinct constituent messages, capped at 3.
    pub messages: Vec<String>,
}
