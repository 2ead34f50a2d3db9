//! Data model: error records, patterns, notifications, recovery
//! records, snapshots, and runtime state.

mod error_record;
mod notification;
mod pattern;
mod recovery;
mod snapshot;

pub use error_record::{ErrorFilter, ErrorRecord, RuntimeState};
pub use notification::{AggregatedInfo, Channel, NotificationRecord};
pub use pattern::{ErrorPattern, Trend};
pub use recovery::{RecoveryRecord, RecoveryState};
pub use snapshot::{Snapshot, SnapshotFilter};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordinal urgency classification. Drives notification thresholds,
/// snapshot capture, and channel gating. Ordering is Low < Medium <
/// High < Critical.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// One level up, saturating at Critical.
    pub fn escalate(self) -> Self {
        match self {
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High => Self::Critical,
            Self::Critical => Self::Critical,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error category, inferred from message/context keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Network,
    Rendering,
    Memory,
    Audio,
    Storage,
    General,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Rendering => "rendering",
            Self::Memory => "memory",
            Self::Audio => "audio",
            Self::Storage => "storage",
            Self::General => "general",
        }
    }

    /// Parse a category name as it appears in error context (`type` key).
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "network" => Some(Self::Network),
            "rendering" => Some(Self::Rendering),
            "memory" => Some(Self::Memory),
            "audio" => Some(Self::Audio),
            "storage" => Some(Self::Storage),
            "general" => Some(Self::General),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time window a report or statistics query covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportScope {
    Session,
    LastHour,
    LastDay,
}

impl ReportScope {
    /// Earliest timestamp the scope includes.
    pub fn cutoff(self, now: u64, session_start: u64) -> u64 {
        match self {
            Self::Session => session_start,
            Self::LastHour => now.saturating_sub(60 * 60_000),
            Self::LastDay => now.saturating_sub(24 * 60 * 60_000),
        }
    }
}

/// Stable identifier grouping recurring errors: xxh3 of the normalized
/// message + category + salient context.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord,
)]
#[serde(transparent)]
pub struct Fingerprint(pub u64);

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}
