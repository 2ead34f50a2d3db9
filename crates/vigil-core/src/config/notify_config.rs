//! Notification system configuration: channels, rate limits, filters,
//! severity thresholds, and aggregation windows.

use serde::{Deserialize, Serialize};

use crate::models::{Category, Severity};

/// Minimum-severity gate applied per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelLevel {
    #[default]
    All,
    High,
    Critical,
}

impl ChannelLevel {
    pub fn admits(self, severity: Severity) -> bool {
        match self {
            Self::All => true,
            Self::High => severity >= Severity::High,
            Self::Critical => severity >= Severity::Critical,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    pub enabled: Option<bool>,
    pub level: ChannelLevel,
    /// Webhook endpoint URL; only meaningful for the webhook channel.
    pub url: Option<String>,
}

impl ChannelConfig {
    pub fn effective_enabled(&self, default: bool) -> bool {
        self.enabled.unwrap_or(default)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelsConfig {
    pub console: ChannelConfig,
    pub ui: ChannelConfig,
    pub storage: ChannelConfig,
    pub webhook: ChannelConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Default: 10.
    pub max_per_minute: Option<u32>,
    /// Default: 100.
    pub max_per_hour: Option<u32>,
}

/// Occurrence-count gates per severity. Critical always passes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Default: 1 (immediate).
    pub critical: Option<u64>,
    /// Default: 3.
    pub high: Option<u64>,
    /// Default: 5.
    pub medium: Option<u64>,
    /// Default: 10.
    pub low: Option<u64>,
}

impl ThresholdConfig {
    pub fn for_severity(&self, severity: Severity) -> u64 {
        match severity {
            Severity::Critical => self.critical.unwrap_or(1),
            Severity::High => self.high.unwrap_or(3),
            Severity::Medium => self.medium.unwrap_or(5),
            Severity::Low => self.low.unwrap_or(10),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Default: true.
    pub enabled: Option<bool>,
    /// Flush window per group in millis. Default: 60 s.
    pub window_ms: Option<u64>,
}

impl AggregationConfig {
    pub fn effective_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    pub fn effective_window_ms(&self) -> u64 {
        self.window_ms.unwrap_or(60_000)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Default: true.
    pub enabled: Option<bool>,
    pub rate_limit: RateLimitConfig,
    pub max_per_minute: Option<u32>,
    /// Severities eligible for notification. Default: medium and above.
    pub severities: Option<Vec<Severity>>,
    /// Category allow-list; empty means all categories.
    pub categories: Vec<Category>,
    /// Fingerprint substring patterns; if non-empty, only matching
    /// fingerprints notify.
    pub include_patterns: Vec<String>,
    /// Fingerprint substring patterns that suppress notification.
    pub exclude_patterns: Vec<String>,
    pub thresholds: ThresholdConfig,
    pub aggregation: AggregationConfig,
    pub channels: ChannelsConfig,
    /// Bounded notification history length. Default: 1000.
    pub max_notifications: Option<usize>,
    /// History entries older than this are purged. Default: 24 h.
    pub expiry_ms: Option<u64>,
    /// Base UI display duration, scaled by severity. Default: 5 s.
    pub ui_base_duration_ms: Option<u64>,
    /// Maximum concurrently visible UI notifications. Default: 5.
    pub ui_max_active: Option<usize>,
}

impl NotifyConfig {
    pub fn effective_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    /// `max_per_minute` at the top level wins over the nested table, so
    /// short configs can say `notify.max_per_minute = 3`.
    pub fn effective_max_per_minute(&self) -> u32 {
        self.max_per_minute
            .or(self.rate_limit.max_per_minute)
            .unwrap_or(10)
    }

    pub fn effective_max_per_hour(&self) -> u32 {
        self.rate_limit.max_per_hour.unwrap_or(100)
    }

    pub fn effective_severities(&self) -> Vec<Severity> {
        self.severities.clone().unwrap_or_else(|| {
            vec![Severity::Medium, Severity::High, Severity::Critical]
        })
    }

    pub fn effective_max_notifications(&self) -> usize {
        self.max_notifications.unwrap_or(1000)
    }

    pub fn effective_expiry_ms(&self) -> u64 {
        self.expiry_ms.unwrap_or(24 * 60 * 60 * 1000)
    }

    pub fn effective_ui_base_duration_ms(&self) -> u64 {
        self.ui_base_duration_ms.unwrap_or(5_000)
    }

    pub fn effective_ui_max_active(&self) -> usize {
        self.ui_max_active.unwrap_or(5)
    }
}
