//! Fixed-window rate limiting with per-minute and per-hour budgets.
//! The "limit exceeded" warning fires once per window so a storm does
//! not turn the log into its own storm.

use serde::Serialize;
use tracing::warn;

use vigil_core::errors::NotifyError;

const MINUTE_MS: u64 = 60_000;
const HOUR_MS: u64 = 60 * 60_000;

/// Point-in-time limiter state, surfaced through statistics.
#[derive(Debug, Clone, Serialize)]
pub struct RateLimitStatus {
    pub minute_count: u32,
    pub minute_limit: u32,
    /// Epoch millis at which the minute window resets.
    pub minute_reset: u64,
    pub hour_count: u32,
    pub hour_limit: u32,
    pub hour_reset: u64,
    pub limited: bool,
}

#[derive(Debug)]
pub struct RateLimiter {
    max_per_minute: u32,
    max_per_hour: u32,
    minute_count: u32,
    minute_start: u64,
    hour_count: u32,
    hour_start: u64,
    warned: bool,
}

impl RateLimiter {
    pub fn new(max_per_minute: u32, max_per_hour: u32) -> Self {
        Self {
            max_per_minute,
            max_per_hour,
            minute_count: 0,
            minute_start: 0,
            hour_count: 0,
            hour_start: 0,
            warned: false,
        }
    }

    pub fn update_limits(&mut self, max_per_minute: u32, max_per_hour: u32) {
        self.max_per_minute = max_per_minute;
        self.max_per_hour = max_per_hour;
    }

    /// Consume one slot if both windows have budget left.
    pub fn allow(&mut self, now: u64) -> bool {
        self.roll_windows(now);

        if self.minute_count >= self.max_per_minute || self.hour_count >= self.max_per_hour {
            if !self.warned {
                warn!(
                    minute_count = self.minute_count,
                    hour_count = self.hour_count,
                    error = %NotifyError::RateLimited,
                    "suppressing notifications until the window resets"
                );
                self.warned = true;
            }
            return false;
        }

        self.minute_count += 1;
        self.hour_count += 1;
        true
    }

    pub fn status(&self, now: u64) -> RateLimitStatus {
        // Report as if windows had rolled, without mutating.
        let (minute_count, minute_start) = if now.saturating_sub(self.minute_start) >= MINUTE_MS {
            (0, now)
        } else {
            (self.minute_count, self.minute_start)
        };
        let (hour_count, hour_start) = if now.saturating_sub(self.hour_start) >= HOUR_MS {
            (0, now)
        } else {
            (self.hour_count, self.hour_start)
        };
        RateLimitStatus {
            minute_count,
            minute_limit: self.max_per_minute,
            minute_reset: minute_start + MINUTE_MS,
            hour_count,
            hour_limit: self.max_per_hour,
            hour_reset: hour_start + HOUR_MS,
            limited: minute_count >= self.max_per_minute || hour_count >= self.max_per_hour,
        }
    }

    fn roll_windows(&mut self, now: u64) {
        if now.saturating_sub(self.minute_start) >= MINUTE_MS {
            self.minute_count = 0;
            self.minute_start = now;
            self.warned = false;
        }
        if now.saturating_sub(self.hour_start) >= HOUR_MS {
            self.hour_count = 0;
            self.hour_start = now;
        }
    }
}
