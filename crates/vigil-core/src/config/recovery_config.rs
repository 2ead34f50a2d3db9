//! Recovery tracker configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryConfig {
    /// Default: true.
    pub enabled: Option<bool>,
    /// Maximum strategy attempts per error. Default: 3.
    pub max_retry_attempts: Option<u32>,
    /// Maximum attempts per (strategy, fingerprint) inside the cooldown
    /// window. Default: 2.
    pub max_attempts_per_strategy: Option<u32>,
    /// Cooldown after a failed strategy attempt. Default: 5 minutes.
    pub cooldown_ms: Option<u64>,
    /// Bounded recovery history length. Default: 1000.
    pub max_history: Option<usize>,
}

impl RecoveryConfig {
    pub fn effective_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    pub fn effective_max_retry_attempts(&self) -> u32 {
        self.max_retry_attempts.unwrap_or(3)
    }

    pub fn effective_max_attempts_per_strategy(&self) -> u32 {
        self.max_attempts_per_strategy.unwrap_or(2)
    }

    pub fn effective_cooldown_ms(&self) -> u64 {
        self.cooldown_ms.unwrap_or(5 * 60 * 1000)
    }

    pub fn effective_max_history(&self) -> usize {
        self.max_history.unwrap_or(1000)
    }
}
