//! NotificationSystem: the five-stage pipeline tying the filters, rate
//! limiter, threshold gate, aggregator, and channel dispatcher
//! together, with a bounded history and statistics.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::debug;

use vigil_core::config::NotifyConfig;
use vigil_core::ids;
use vigil_core::models::{ErrorRecord, NotificationRecord, Severity};
use vigil_core::traits::{UiHost, WebhookTransport};
use vigil_storage::ErrorStorage;

use crate::aggregation::Aggregator;
use crate::channels::ChannelDispatcher;
use crate::rate_limit::{RateLimitStatus, RateLimiter};

#[derive(Debug, Clone, Serialize)]
pub struct NotificationStats {
    pub total: usize,
    pub last_hour: usize,
    pub last_day: usize,
    pub by_severity: FxHashMap<String, u64>,
    pub by_category: FxHashMap<String, u64>,
    pub pending_groups: usize,
    pub active_ui: usize,
    pub rate_limit: RateLimitStatus,
}

pub struct NotificationSystem {
    cfg: NotifyConfig,
    limiter: RateLimiter,
    aggregator: Aggregator,
    dispatcher: ChannelDispatcher,
    history: Vec<NotificationRecord>,
    destroyed: bool,
}

impl NotificationSystem {
    pub fn new(cfg: NotifyConfig) -> Self {
        let limiter = RateLimiter::new(
            cfg.effective_max_per_minute(),
            cfg.effective_max_per_hour(),
        );
        let aggregator = Aggregator::new(cfg.aggregation.effective_window_ms());
        let dispatcher = ChannelDispatcher::new(&cfg);
        Self {
            cfg,
            limiter,
            aggregator,
            dispatcher,
            history: Vec::new(),
            destroyed: false,
        }
    }

    pub fn set_ui_host(&mut self, ui: Box<dyn UiHost>) {
        self.dispatcher.set_ui_host(ui);
    }

    pub fn set_transport(&mut self, transport: Arc<dyn WebhookTransport>) {
        self.dispatcher.set_transport(transport);
    }

    /// Run the pipeline for one error. Returns whether a notification
    /// was issued or queued into an aggregation group.
    pub fn process(
        &mut self,
        error: &ErrorRecord,
        pattern_count: u64,
        storage: Option<&mut ErrorStorage>,
        now: u64,
    ) -> bool {
        if self.destroyed || !self.cfg.effective_enabled() {
            return false;
        }
        if !self.passes_filters(error) {
            return false;
        }
        if !self.passes_threshold(error.severity, pattern_count) {
            return false;
        }
        // Only submissions that will notify or queue consume a
        // rate-limit slot.
        if !self.limiter.allow(now) {
            return false;
        }

        // Critical errors are never held back in a group.
        if error.severity < Severity::Critical && self.cfg.aggregation.effective_enabled() {
            self.aggregator.add(error, pattern_count, now);
            return true;
        }

        let mut notification = NotificationRecord {
            id: ids::notification_id(),
            timestamp: now,
            error_id: Some(error.id.clone()),
            message: error.message.clone(),
            severity: error.severity,
            category: error.category,
            fingerprint: Some(error.fingerprint),
            occurrence_count: pattern_count,
            channels: Vec::new(),
            acknowledged: false,
            aggregated: None,
        };
        self.dispatcher.dispatch(&mut notification, storage, now);
        self.push_history(notification);
        true
    }

    /// Dispatch aggregation groups whose windows have elapsed and expire
    /// stale UI elements.
    pub fn flush_due(&mut self, mut storage: Option<&mut ErrorStorage>, now: u64) {
        for mut notification in self.aggregator.flush_due(now) {
            self.dispatcher
                .dispatch(&mut notification, storage.as_deref_mut(), now);
            self.push_history(notification);
        }
        self.dispatcher.tick(now);
    }

    /// Dispatch every pending group regardless of deadlines.
    pub fn flush_all(&mut self, mut storage: Option<&mut ErrorStorage>, now: u64) {
        for mut notification in self.aggregator.flush_all(now) {
            self.dispatcher
                .dispatch(&mut notification, storage.as_deref_mut(), now);
            self.push_history(notification);
        }
    }

    pub fn history(&self) -> &[NotificationRecord] {
        &self.history
    }

    /// Mark a notification acknowledged. Unknown ids return false.
    pub fn acknowledge(&mut self, id: &str) -> bool {
        match self.history.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.acknowledged = true;
                true
            }
            None => false,
        }
    }

    /// Purge history entries older than the configured expiry.
    pub fn cleanup_old(&mut self, now: u64) -> usize {
        let expiry = self.cfg.effective_expiry_ms();
        let before = self.history.len();
        self.history
            .retain(|n| now.saturating_sub(n.timestamp) <= expiry);
        before - self.history.len()
    }

    pub fn statistics(&self, now: u64) -> NotificationStats {
        let hour_ago = now.saturating_sub(60 * 60_000);
        let day_ago = now.saturating_sub(24 * 60 * 60_000);
        let mut by_severity: FxHashMap<String, u64> = FxHashMap::default();
        let mut by_category: FxHashMap<String, u64> = FxHashMap::default();
        let mut last_hour = 0;
        let mut last_day = 0;
        for n in &self.history {
            *by_severity.entry(n.severity.to_string()).or_insert(0) += 1;
            *by_category.entry(n.category.to_string()).or_insert(0) += 1;
            if n.timestamp >= hour_ago {
                last_hour += 1;
            }
            if n.timestamp >= day_ago {
                last_day += 1;
            }
        }
        NotificationStats {
            total: self.history.len(),
            last_hour,
            last_day,
            by_severity,
            by_category,
            pending_groups: self.aggregator.pending_groups(),
            active_ui: self.dispatcher.active_ui_count(),
            rate_limit: self.limiter.status(now),
        }
    }

    /// Merge a partial settings document over the current config.
    pub fn update_settings(&mut self, partial: &serde_json::Value) {
        let mut current = match serde_json::to_value(&self.cfg) {
            Ok(v) => v,
            Err(e) => {
                debug!(error = %e, "settings serialization failed, keeping current config");
                return;
            }
        };
        merge_json(&mut current, partial);
        match serde_json::from_value::<NotifyConfig>(current) {
            Ok(cfg) => {
                self.limiter.update_limits(
                    cfg.effective_max_per_minute(),
                    cfg.effective_max_per_hour(),
                );
                self.aggregator
                    .set_window_ms(cfg.aggregation.effective_window_ms());
                self.dispatcher.apply_config(&cfg);
                self.cfg = cfg;
            }
            Err(e) => debug!(error = %e, "rejecting invalid settings update"),
        }
    }

    /// Current settings as a JSON document for persistence.
    pub fn settings_value(&self) -> Option<serde_json::Value> {
        serde_json::to_value(&self.cfg).ok()
    }

    /// Drop pending groups and live UI elements. Idempotent; a
    /// destroyed system processes nothing.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.aggregator.clear();
        self.dispatcher.destroy();
    }

    fn push_history(&mut self, notification: NotificationRecord) {
        self.history.push(notification);
        let max = self.cfg.effective_max_notifications();
        if self.history.len() > max {
            let excess = self.history.len() - max;
            self.history.drain(..excess);
        }
    }

    fn passes_filters(&self, error: &ErrorRecord) -> bool {
        if !self.cfg.effective_severities().contains(&error.severity) {
            return false;
        }
        if !self.cfg.categories.is_empty() && !self.cfg.categories.contains(&error.category) {
            return false;
        }
        let fp = error.fingerprint.to_string();
        if !self.cfg.include_patterns.is_empty()
            && !self.cfg.include_patterns.iter().any(|p| fp.contains(p))
        {
            return false;
        }
        if self.cfg.exclude_patterns.iter().any(|p| fp.contains(p)) {
            return false;
        }
        true
    }

    /// Lower severities hold back until their pattern has recurred
    /// enough times; once the threshold is reached every further
    /// occurrence proceeds.
    fn passes_threshold(&self, severity: Severity, pattern_count: u64) -> bool {
        pattern_count >= self.cfg.thresholds.for_severity(severity)
    }
}

/// Recursive object merge; non-object values on the right replace.
fn merge_json(base: &mut serde_json::Value, overlay: &serde_json::Value) {
    match (base, overlay) {
        (serde_json::Value::Object(base), serde_json::Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(key) {
                    Some(slot) => merge_json(slot, value),
                    None => {
                        base.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, overlay) => *base = overlay.clone(),
    }
}
