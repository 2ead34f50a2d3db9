//! ErrorReporter — the orchestrator. One entry point (`handle_error`)
//! runs an error through classification, enrichment, fingerprinting,
//! snapshot capture, collection, pattern analysis, notification,
//! persistence, and recovery tracking. No stage failure escapes to the
//! caller.

use std::sync::Arc;

use tracing::{debug, info};

use vigil_analysis::classify::{classify_category, classify_severity};
use vigil_analysis::{fingerprint, ErrorAnalyzer, ErrorCollector};
use vigil_core::clock::Clock;
use vigil_core::config::VigilConfig;
use vigil_core::errors::VigilError;
use vigil_core::ids;
use vigil_core::models::{ErrorFilter, ErrorRecord, Severity};
use vigil_core::traits::{GameRuntime, KeyValueStore, RenderSurface, UiHost, WebhookTransport};
use vigil_core::FxHashMap;
use vigil_notify::NotificationSystem;
use vigil_recovery::{RecoveryStrategy, RecoveryTracker};
use vigil_storage::ErrorStorage;

use crate::snapshot::SnapshotCapture;

pub struct ErrorReporter {
    pub(crate) cfg: VigilConfig,
    pub(crate) session_id: String,
    pub(crate) session_start: u64,
    pub(crate) clock: Box<dyn Clock>,
    runtime: Arc<dyn GameRuntime>,
    pub(crate) collector: ErrorCollector,
    pub(crate) analyzer: ErrorAnalyzer,
    pub(crate) storage: ErrorStorage,
    pub(crate) notifications: NotificationSystem,
    pub(crate) recovery: RecoveryTracker,
    pub(crate) snapshots: SnapshotCapture,
    destroyed: bool,
}

impl ErrorReporter {
    pub fn new(
        cfg: VigilConfig,
        kv: Box<dyn KeyValueStore>,
        runtime: Arc<dyn GameRuntime>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let session_id = ids::session_id();
        let session_start = clock.now_ms();

        let collector = ErrorCollector::new(&cfg.analysis);
        let analyzer = ErrorAnalyzer::new(&cfg.analysis);
        let mut storage = ErrorStorage::new(kv, cfg.storage.clone());
        storage.record_session(&session_id, session_start);
        let mut notifications = NotificationSystem::new(cfg.notify.clone());
        // Settings persisted by a previous session override config
        // defaults.
        if let Some(settings) = storage.load_settings() {
            notifications.update_settings(&settings);
        }
        let recovery = RecoveryTracker::new(cfg.recovery.clone(), Arc::clone(&runtime));
        let snapshots = SnapshotCapture::new(cfg.snapshot.clone());

        info!(session_id = %session_id, "error reporter started");
        Self {
            cfg,
            session_id,
            session_start,
            clock,
            runtime,
            collector,
            analyzer,
            storage,
            notifications,
            recovery,
            snapshots,
            destroyed: false,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn set_ui_host(&mut self, ui: Box<dyn UiHost>) {
        self.notifications.set_ui_host(ui);
    }

    pub fn set_transport(&mut self, transport: Arc<dyn WebhookTransport>) {
        self.notifications.set_transport(transport);
    }

    pub fn set_surface(&mut self, surface: Box<dyn RenderSurface>) {
        self.snapshots.set_surface(surface);
    }

    pub fn register_custom_strategy(
        &mut self,
        strategy: Box<dyn RecoveryStrategy>,
    ) -> Result<(), vigil_core::errors::RecoveryError> {
        self.recovery.register_strategy(strategy)
    }

    /// Ingest one error. Always returns the enriched record, even when
    /// the reporter is already destroyed (the record is then synthesized
    /// without touching any stage).
    pub fn handle_error(
        &mut self,
        message: &str,
        stack: Option<&str>,
        mut context: FxHashMap<String, serde_json::Value>,
    ) -> ErrorRecord {
        let now = self.clock.now_ms();

        // Runtime state enrichment happens before classification so a
        // stopped runtime can escalate severity.
        if let Ok(state) = serde_json::to_value(self.runtime.state()) {
            context.entry("game_state".to_string()).or_insert(state);
        }

        let severity = classify_severity(message, &context, &self.cfg.classify);
        let category = classify_category(message, &context, &self.cfg.classify);
        let fp = fingerprint(message, category, &context);

        let mut record = ErrorRecord {
            id: ids::error_id(),
            message: message.to_string(),
            stack: stack.map(str::to_string),
            severity,
            category,
            fingerprint: fp,
            timestamp: now,
            session_id: self.session_id.clone(),
            context,
            snapshot_id: None,
            acknowledged: false,
            recovered_by: None,
        };

        if self.destroyed {
            debug!(error_id = %record.id, "reporter destroyed, dropping error");
            return record;
        }

        record.snapshot_id = self.snapshots.capture(&record, now);

        self.collector.collect(record.clone());
        let occurrence_count = self.analyzer.analyze(&record).count;

        self.notifications
            .process(&record, occurrence_count, Some(&mut self.storage), now);
        self.notifications.flush_due(Some(&mut self.storage), now);

        self.storage.store(&record, now);

        if severity >= Severity::High {
            self.recovery.track_error(&record, now);
            if severity == Severity::Critical && self.recovery.auto_recover(&record.id, now) {
                if let Some(rec) = self.recovery.record_for_error(&record.id) {
                    record.recovered_by = rec.strategy.clone();
                }
                if let Some(stored) = self.collector.get_mut(&record.id) {
                    stored.recovered_by = record.recovered_by.clone();
                }
            }
        }

        record
    }

    /// Run auto-recovery for a previously handled error.
    pub fn recover(&mut self, error_id: &str) -> bool {
        let now = self.clock.now_ms();
        if self.recovery.record_for_error(error_id).is_none() {
            let e = VigilError::RecordNotFound {
                id: error_id.to_string(),
            };
            debug!(error = %e, "recovery requested for an untracked error");
            return false;
        }
        if !self.recovery.auto_recover(error_id, now) {
            return false;
        }
        let strategy = self
            .recovery
            .record_for_error(error_id)
            .and_then(|r| r.strategy.clone());
        if let Some(record) = self.collector.get_mut(error_id) {
            record.recovered_by = strategy;
        }
        true
    }

    /// Drive timer-based work: aggregation flushes and UI expiry.
    pub fn tick(&mut self) {
        let now = self.clock.now_ms();
        self.notifications.flush_due(Some(&mut self.storage), now);
    }

    /// Collected errors matching the filter, newest last.
    pub fn error_history(&self, filter: &ErrorFilter) -> Vec<ErrorRecord> {
        self.collector
            .errors(filter)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Drop patterns that have gone stale. Returns how many.
    pub fn cleanup_old_patterns(&mut self) -> usize {
        let now = self.clock.now_ms();
        self.analyzer.cleanup_stale(now)
    }

    /// Purge expired storage, notification history, and snapshots.
    pub fn cleanup(&mut self) {
        let now = self.clock.now_ms();
        self.storage.cleanup(now);
        self.notifications.cleanup_old(now);
        self.snapshots.clear_old(now);
    }

    /// Issued notifications, oldest first.
    pub fn notifications(&self) -> &[vigil_core::models::NotificationRecord] {
        self.notifications.history()
    }

    /// Errors as persisted through the key-value store.
    pub fn persisted_errors(&self) -> Vec<ErrorRecord> {
        self.storage.stored_errors()
    }

    pub fn notification_statistics(&self) -> vigil_notify::NotificationStats {
        self.notifications.statistics(self.clock.now_ms())
    }

    pub fn recovery_statistics(&self) -> vigil_recovery::RecoveryStats {
        self.recovery.statistics()
    }

    pub fn recovery_report(&self, scope: vigil_core::models::ReportScope) -> vigil_recovery::RecoveryReport {
        self.recovery
            .report(scope, self.clock.now_ms(), self.session_start)
    }

    pub fn snapshot(&self, id: &str) -> Option<&vigil_core::models::Snapshot> {
        self.snapshots.get(id)
    }

    pub fn snapshots(
        &self,
        filter: &vigil_core::models::SnapshotFilter,
    ) -> Vec<&vigil_core::models::Snapshot> {
        self.snapshots.snapshots(filter)
    }

    /// Mark a notification acknowledged by id.
    pub fn acknowledge_notification(&mut self, id: &str) -> bool {
        self.notifications.acknowledge(id)
    }

    /// Mark a collected error acknowledged by id. Unknown ids return
    /// false.
    pub fn acknowledge_error(&mut self, id: &str) -> bool {
        match self.collector.get_mut(id) {
            Some(record) => {
                record.acknowledged = true;
                true
            }
            None => false,
        }
    }

    /// Merge a partial notification settings document and persist it.
    pub fn update_settings(&mut self, partial: &serde_json::Value) {
        self.notifications.update_settings(partial);
        if let Some(settings) = self.notifications.settings_value() {
            self.storage.save_settings(&settings);
        }
    }

    /// Tear down: cancel in-flight recovery, drop timers and UI
    /// elements, persist settings. Idempotent.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        if let Some(settings) = self.notifications.settings_value() {
            self.storage.save_settings(&settings);
        }
        self.recovery.destroy();
        self.notifications.destroy();
        info!(session_id = %self.session_id, "error reporter destroyed");
    }
}
