//! RecoveryTracker: bounded-retry automatic recovery driven by the
//! strategy registry, with cooldowns, cancellation, and statistics.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use tracing::{debug, info, warn};

use vigil_core::config::RecoveryConfig;
use vigil_core::errors::RecoveryError;
use vigil_core::ids;
use vigil_core::models::{
    Category, ErrorRecord, Fingerprint, RecoveryRecord, RecoveryState, ReportScope, Severity,
};
use vigil_core::traits::GameRuntime;

use crate::strategies::{RecoveryContext, RecoveryStrategy, StrategyRegistry};

/// Shared cancellation flag. Cloned out of the tracker so in-flight
/// work can be cancelled from outside; checked before every state
/// commit.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Attempt/success counters for one strategy or category.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct StrategyStats {
    pub attempts: u64,
    pub successes: u64,
    pub failures: u64,
}

impl StrategyStats {
    /// Success ratio; 0.5 until the strategy has any history.
    pub fn effectiveness(&self) -> f64 {
        if self.attempts == 0 {
            0.5
        } else {
            self.successes as f64 / self.attempts as f64
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecoveryStats {
    pub tracked: usize,
    pub recovered: usize,
    pub exhausted: usize,
    pub total_attempts: u64,
    /// Recovered over tracked records.
    pub recovery_rate: f64,
    /// Mean track-to-recovery wall time over recovered records.
    pub avg_recovery_ms: Option<f64>,
    pub by_strategy: FxHashMap<String, StrategyStats>,
    pub by_category: FxHashMap<String, StrategyStats>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecoveryReport {
    pub scope: ReportScope,
    pub generated_at: u64,
    pub stats: RecoveryStats,
    pub recommendations: Vec<String>,
}

struct TrackedMeta {
    message: String,
    severity: Severity,
}

#[derive(Debug, Clone, Copy)]
struct Cooldown {
    attempts: u32,
    reset_at: u64,
}

pub struct RecoveryTracker {
    cfg: RecoveryConfig,
    registry: StrategyRegistry,
    runtime: Arc<dyn GameRuntime>,
    records: FxHashMap<String, RecoveryRecord>,
    meta: FxHashMap<String, TrackedMeta>,
    by_error: FxHashMap<String, String>,
    /// Record ids in tracking order, for history eviction.
    order: Vec<String>,
    active: FxHashSet<String>,
    cancel: CancelFlag,
    strategy_stats: FxHashMap<String, StrategyStats>,
    category_stats: FxHashMap<Category, StrategyStats>,
    cooldowns: FxHashMap<(String, Fingerprint), Cooldown>,
    destroyed: bool,
}

impl RecoveryTracker {
    pub fn new(cfg: RecoveryConfig, runtime: Arc<dyn GameRuntime>) -> Self {
        Self::with_registry(cfg, runtime, StrategyRegistry::with_builtins())
    }

    pub fn with_registry(
        cfg: RecoveryConfig,
        runtime: Arc<dyn GameRuntime>,
        registry: StrategyRegistry,
    ) -> Self {
        Self {
            cfg,
            registry,
            runtime,
            records: FxHashMap::default(),
            meta: FxHashMap::default(),
            by_error: FxHashMap::default(),
            order: Vec::new(),
            active: FxHashSet::default(),
            cancel: CancelFlag::new(),
            strategy_stats: FxHashMap::default(),
            category_stats: FxHashMap::default(),
            cooldowns: FxHashMap::default(),
            destroyed: false,
        }
    }

    pub fn register_strategy(
        &mut self,
        strategy: Box<dyn RecoveryStrategy>,
    ) -> Result<(), RecoveryError> {
        self.registry.register(strategy)
    }

    /// Clone of the cancellation flag for external holders.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Begin tracking an error for recovery. Returns the record, or
    /// None when recovery is disabled or the tracker is destroyed.
    /// Tracking the same error twice returns the existing record.
    pub fn track_error(&mut self, error: &ErrorRecord, now: u64) -> Option<RecoveryRecord> {
        if self.destroyed || !self.cfg.effective_enabled() {
            return None;
        }
        if let Some(record_id) = self.by_error.get(&error.id) {
            return self.records.get(record_id).cloned();
        }

        self.evict_history_overflow();

        let record = RecoveryRecord {
            id: ids::recovery_id(),
            error_id: error.id.clone(),
            fingerprint: error.fingerprint,
            category: error.category,
            attempts: 0,
            last_attempt: None,
            state: RecoveryState::Tracked,
            strategy: None,
            tracked_at: now,
            completed_at: None,
        };
        debug!(
            error_id = %error.id,
            category = %error.category,
            "tracking error for recovery"
        );
        self.by_error.insert(error.id.clone(), record.id.clone());
        self.meta.insert(
            record.id.clone(),
            TrackedMeta {
                message: error.message.clone(),
                severity: error.severity,
            },
        );
        self.order.push(record.id.clone());
        self.records.insert(record.id.clone(), record.clone());
        Some(record)
    }

    /// Run one named strategy against a tracked error. An unknown error
    /// id or strategy name returns false without side effects;
    /// otherwise the attempt is committed regardless of outcome.
    pub fn attempt_recovery(&mut self, error_id: &str, strategy_name: &str, now: u64) -> bool {
        if self.destroyed {
            return false;
        }
        let record_id = match self.by_error.get(error_id) {
            Some(id) => id.clone(),
            None => return false,
        };
        if self
            .records
            .get(&record_id)
            .map(|r| r.state.is_terminal())
            .unwrap_or(true)
        {
            return false;
        }
        if self.registry.get(strategy_name).is_none() {
            let e = RecoveryError::UnknownStrategy {
                name: strategy_name.to_string(),
            };
            debug!(error = %e, "recovery attempt rejected");
            return false;
        }
        self.run_strategy(&record_id, strategy_name, now)
    }

    /// Try candidate strategies in priority-then-effectiveness order
    /// until one succeeds or the attempt budget is spent. Returns false
    /// when the error is already being recovered.
    pub fn auto_recover(&mut self, error_id: &str, now: u64) -> bool {
        if self.destroyed {
            return false;
        }
        let record_id = match self.by_error.get(error_id) {
            Some(id) => id.clone(),
            None => return false,
        };
        let (fingerprint, already_terminal) = match self.records.get(&record_id) {
            Some(r) => (r.fingerprint, r.state.is_terminal()),
            None => return false,
        };
        if already_terminal || !self.active.insert(record_id.clone()) {
            return false;
        }

        let max_attempts = self.cfg.effective_max_retry_attempts();
        let candidates = self.candidate_names(&record_id, fingerprint, now);
        let mut recovered = false;

        for name in candidates {
            if self.cancel.is_cancelled() {
                break;
            }
            let attempts = self
                .records
                .get(&record_id)
                .map(|r| r.attempts)
                .unwrap_or(max_attempts);
            if attempts >= max_attempts {
                break;
            }
            if self.run_strategy(&record_id, &name, now) {
                recovered = true;
                break;
            }
        }

        if !recovered && !self.cancel.is_cancelled() {
            if let Some(record) = self.records.get_mut(&record_id) {
                if record.attempts >= max_attempts && !record.state.is_terminal() {
                    record.state = RecoveryState::Exhausted;
                    record.completed_at = Some(now);
                    let e = RecoveryError::Exhausted {
                        attempts: record.attempts,
                    };
                    info!(error_id, error = %e, "giving up on recovery");
                }
            }
        }

        self.active.remove(&record_id);
        recovered
    }

    /// True while an auto-recovery for the error is in flight.
    pub fn pending_recovery(&self, error_id: &str) -> bool {
        self.by_error
            .get(error_id)
            .map(|id| self.active.contains(id))
            .unwrap_or(false)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn record_for_error(&self, error_id: &str) -> Option<&RecoveryRecord> {
        self.by_error
            .get(error_id)
            .and_then(|id| self.records.get(id))
    }

    /// Records in tracking order.
    pub fn history(&self) -> Vec<&RecoveryRecord> {
        self.order
            .iter()
            .filter_map(|id| self.records.get(id))
            .collect()
    }

    pub fn statistics(&self) -> RecoveryStats {
        self.stats_for(|_| true)
    }

    pub fn report(&self, scope: ReportScope, now: u64, session_start: u64) -> RecoveryReport {
        let cutoff = scope.cutoff(now, session_start);
        let stats = self.stats_for(|r| r.tracked_at >= cutoff);

        let mut recommendations = Vec::new();
        for (name, s) in &stats.by_strategy {
            if s.attempts >= 3 && s.effectiveness() < 0.3 {
                recommendations.push(format!(
                    "strategy {name} succeeds in under 30% of attempts, review its triggers"
                ));
            }
        }
        for (category, s) in &stats.by_category {
            if s.attempts > 0 && s.successes == 0 {
                recommendations.push(format!(
                    "no successful recovery for {category} errors yet"
                ));
            }
        }
        recommendations.sort();

        RecoveryReport {
            scope,
            generated_at: now,
            stats,
            recommendations,
        }
    }

    /// Cancel in-flight work and stop accepting new tracking.
    /// Idempotent.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.cancel.cancel();
        self.active.clear();
    }

    fn stats_for(&self, include: impl Fn(&RecoveryRecord) -> bool) -> RecoveryStats {
        let mut tracked = 0;
        let mut recovered = 0;
        let mut exhausted = 0;
        let mut total_attempts = 0u64;
        let mut durations = Vec::new();
        for record in self.records.values().filter(|r| include(r)) {
            tracked += 1;
            total_attempts += u64::from(record.attempts);
            match record.state {
                RecoveryState::Recovered => {
                    recovered += 1;
                    if let Some(d) = record.recovery_duration() {
                        durations.push(d);
                    }
                }
                RecoveryState::Exhausted => exhausted += 1,
                _ => {}
            }
        }
        let recovery_rate = if tracked == 0 {
            0.0
        } else {
            recovered as f64 / tracked as f64
        };
        let avg_recovery_ms = if durations.is_empty() {
            None
        } else {
            Some(durations.iter().sum::<u64>() as f64 / durations.len() as f64)
        };
        RecoveryStats {
            tracked,
            recovered,
            exhausted,
            total_attempts,
            recovery_rate,
            avg_recovery_ms,
            by_strategy: self.strategy_stats.clone(),
            by_category: self
                .category_stats
                .iter()
                .map(|(c, s)| (c.to_string(), *s))
                .collect(),
        }
    }

    /// Names of eligible candidates ordered by priority, breaking ties
    /// on historical effectiveness.
    fn candidate_names(&self, record_id: &str, fingerprint: Fingerprint, now: u64) -> Vec<String> {
        let (record, meta) = match (self.records.get(record_id), self.meta.get(record_id)) {
            (Some(r), Some(m)) => (r, m),
            _ => return Vec::new(),
        };
        let ctx = RecoveryContext {
            error_id: &record.error_id,
            message: &meta.message,
            category: record.category,
            severity: meta.severity,
            fingerprint: record.fingerprint,
            runtime: self.runtime.as_ref(),
        };
        let mut named: Vec<(u32, f64, String)> = self
            .registry
            .candidates(&ctx)
            .into_iter()
            .filter(|s| self.strategy_eligible(s.name(), fingerprint, now))
            .map(|s| {
                let eff = self
                    .strategy_stats
                    .get(s.name())
                    .copied()
                    .unwrap_or_default()
                    .effectiveness();
                (s.priority(), eff, s.name().to_string())
            })
            .collect();
        named.sort_by(|a, b| {
            a.0.cmp(&b.0)
                .then(b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal))
        });
        named.into_iter().map(|(_, _, name)| name).collect()
    }

    /// A strategy sits out once it has burned its per-fingerprint
    /// attempt budget, until the cooldown elapses.
    fn strategy_eligible(&self, name: &str, fingerprint: Fingerprint, now: u64) -> bool {
        match self.cooldowns.get(&(name.to_string(), fingerprint)) {
            Some(cd) if now < cd.reset_at => {
                cd.attempts < self.cfg.effective_max_attempts_per_strategy()
            }
            _ => true,
        }
    }

    fn note_cooldown(&mut self, name: &str, fingerprint: Fingerprint, now: u64) {
        let cooldown_ms = self.cfg.effective_cooldown_ms();
        let entry = self
            .cooldowns
            .entry((name.to_string(), fingerprint))
            .or_insert(Cooldown {
                attempts: 0,
                reset_at: 0,
            });
        if now >= entry.reset_at {
            entry.attempts = 0;
        }
        entry.attempts += 1;
        entry.reset_at = now + cooldown_ms;
    }

    /// Commit one attempt. Caller has validated record and strategy.
    fn run_strategy(&mut self, record_id: &str, strategy_name: &str, now: u64) -> bool {
        let fingerprint = match self.records.get_mut(record_id) {
            Some(record) => {
                record.attempts += 1;
                record.last_attempt = Some(now);
                record.state = RecoveryState::Attempting;
                record.fingerprint
            }
            None => return false,
        };
        self.note_cooldown(strategy_name, fingerprint, now);

        let outcome = {
            let record = &self.records[record_id];
            let meta = &self.meta[record_id];
            let ctx = RecoveryContext {
                error_id: &record.error_id,
                message: &meta.message,
                category: record.category,
                severity: meta.severity,
                fingerprint: record.fingerprint,
                runtime: self.runtime.as_ref(),
            };
            match self.registry.get(strategy_name) {
                Some(strategy) => strategy.recover(&ctx),
                None => return false,
            }
        };

        let stats = self
            .strategy_stats
            .entry(strategy_name.to_string())
            .or_default();
        stats.attempts += 1;
        let category = self.records[record_id].category;
        let cat_stats = self.category_stats.entry(category).or_default();
        cat_stats.attempts += 1;

        // Cancellation between the hook returning and the state commit
        // drops the result.
        if self.cancel.is_cancelled() {
            debug!(
                strategy = strategy_name,
                error = %RecoveryError::Cancelled,
                "dropping recovery result"
            );
            if let Some(record) = self.records.get_mut(record_id) {
                record.state = RecoveryState::Tracked;
            }
            return false;
        }

        let max_attempts = self.cfg.effective_max_retry_attempts();
        match outcome {
            Ok(()) => {
                if let Some(s) = self.strategy_stats.get_mut(strategy_name) {
                    s.successes += 1;
                }
                if let Some(s) = self.category_stats.get_mut(&category) {
                    s.successes += 1;
                }
                if let Some(record) = self.records.get_mut(record_id) {
                    record.state = RecoveryState::Recovered;
                    record.strategy = Some(strategy_name.to_string());
                    record.completed_at = Some(now);
                    info!(
                        error_id = %record.error_id,
                        strategy = strategy_name,
                        "error recovered"
                    );
                }
                true
            }
            Err(e) => {
                if let Some(s) = self.strategy_stats.get_mut(strategy_name) {
                    s.failures += 1;
                }
                if let Some(s) = self.category_stats.get_mut(&category) {
                    s.failures += 1;
                }
                warn!(strategy = strategy_name, error = %e, "recovery attempt failed");
                if let Some(record) = self.records.get_mut(record_id) {
                    if record.attempts >= max_attempts {
                        record.state = RecoveryState::Exhausted;
                        record.completed_at = Some(now);
                    } else {
                        record.state = RecoveryState::Tracked;
                    }
                }
                false
            }
        }
    }

    /// Drop oldest terminal records when the history bound is reached.
    fn evict_history_overflow(&mut self) {
        let max = self.cfg.effective_max_history();
        while self.order.len() >= max {
            let Some(pos) = self.order.iter().position(|id| {
                self.records
                    .get(id)
                    .map(|r| r.state.is_terminal())
                    .unwrap_or(true)
            }) else {
                break;
            };
            let id = self.order.remove(pos);
            if let Some(record) = self.records.remove(&id) {
                self.by_error.remove(&record.error_id);
            }
            self.meta.remove(&id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use vigil_core::errors::RecoveryError;
    use vigil_core::traits::NullRuntime;
    use vigil_core::FxHashMap as Ctx;

    fn error(id: &str, message: &str, category: Category, severity: Severity) -> ErrorRecord {
        ErrorRecord {
            id: id.into(),
            message: message.into(),
            stack: None,
            severity,
            category,
            fingerprint: Fingerprint(0x41),
            timestamp: 0,
            session_id: "s".into(),
            context: Ctx::default(),
            snapshot_id: None,
            acknowledged: false,
            recovered_by: None,
        }
    }

    /// Strategy with scripted outcomes per attempt.
    struct Scripted {
        name: &'static str,
        outcomes: Mutex<Vec<Result<(), ()>>>,
    }

    impl Scripted {
        fn new(name: &'static str, outcomes: Vec<Result<(), ()>>) -> Self {
            Self {
                name,
                outcomes: Mutex::new(outcomes),
            }
        }
    }

    impl RecoveryStrategy for Scripted {
        fn name(&self) -> &str {
            self.name
        }

        fn can_recover(&self, _ctx: &RecoveryContext<'_>) -> bool {
            true
        }

        fn recover(&self, _ctx: &RecoveryContext<'_>) -> Result<(), RecoveryError> {
            let mut outcomes = self.outcomes.lock().unwrap();
            match outcomes.pop() {
                Some(Ok(())) => Ok(()),
                _ => Err(RecoveryError::StrategyFailed {
                    strategy: self.name.to_string(),
                    message: "scripted failure".into(),
                }),
            }
        }
    }

    /// Strategy that cancels the shared flag mid-recovery.
    struct Cancelling(CancelFlag);

    impl RecoveryStrategy for Cancelling {
        fn name(&self) -> &str {
            "cancelling"
        }

        fn can_recover(&self, _ctx: &RecoveryContext<'_>) -> bool {
            true
        }

        fn recover(&self, _ctx: &RecoveryContext<'_>) -> Result<(), RecoveryError> {
            self.0.cancel();
            Ok(())
        }
    }

    fn tracker_with(strategies: Vec<Box<dyn RecoveryStrategy>>) -> RecoveryTracker {
        let mut registry = StrategyRegistry::new();
        for s in strategies {
            registry.register(s).unwrap();
        }
        RecoveryTracker::with_registry(
            RecoveryConfig::default(),
            Arc::new(NullRuntime),
            registry,
        )
    }

    #[test]
    fn track_returns_none_when_disabled() {
        let mut t = RecoveryTracker::new(
            RecoveryConfig {
                enabled: Some(false),
                ..Default::default()
            },
            Arc::new(NullRuntime),
        );
        assert!(t
            .track_error(&error("e1", "x", Category::General, Severity::High), 0)
            .is_none());
    }

    #[test]
    fn track_is_deduplicated_by_error_id() {
        let mut t = tracker_with(vec![]);
        let e = error("e1", "x", Category::General, Severity::High);
        let first = t.track_error(&e, 0).unwrap();
        let second = t.track_error(&e, 100).unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(t.history().len(), 1);
    }

    #[test]
    fn attempt_unknown_id_or_strategy_has_no_side_effects() {
        let mut t = tracker_with(vec![Box::new(Scripted::new("fix", vec![Ok(())]))]);
        let e = error("e1", "x", Category::General, Severity::High);
        t.track_error(&e, 0);

        assert!(!t.attempt_recovery("missing", "fix", 10));
        assert!(!t.attempt_recovery("e1", "missing", 10));
        let record = t.record_for_error("e1").unwrap();
        assert_eq!(record.attempts, 0);
        assert_eq!(record.last_attempt, None);
    }

    #[test]
    fn failed_attempt_still_commits_counters() {
        let mut t = tracker_with(vec![Box::new(Scripted::new("fix", vec![Err(())]))]);
        let e = error("e1", "x", Category::General, Severity::High);
        t.track_error(&e, 0);

        assert!(!t.attempt_recovery("e1", "fix", 42));
        let record = t.record_for_error("e1").unwrap();
        assert_eq!(record.attempts, 1);
        assert_eq!(record.last_attempt, Some(42));
        assert_eq!(record.state, RecoveryState::Tracked);
    }

    #[test]
    fn auto_recover_succeeds_on_later_candidate() {
        // "bad" always fails, "good" succeeds once.
        let mut t = tracker_with(vec![
            Box::new(Scripted::new("bad", vec![])),
            Box::new(Scripted::new("good", vec![Ok(())])),
        ]);
        let e = error("e1", "x", Category::General, Severity::High);
        t.track_error(&e, 0);

        assert!(t.auto_recover("e1", 100));
        let record = t.record_for_error("e1").unwrap();
        assert!(record.recovered());
        assert_eq!(record.strategy.as_deref(), Some("good"));
        assert_eq!(record.attempts, 2);
        assert_eq!(t.active_count(), 0);
    }

    #[test]
    fn auto_recover_exhausts_after_max_attempts() {
        let mut t = tracker_with(vec![
            Box::new(Scripted::new("a", vec![])),
            Box::new(Scripted::new("b", vec![])),
            Box::new(Scripted::new("c", vec![])),
            Box::new(Scripted::new("d", vec![])),
        ]);
        let e = error("e1", "x", Category::General, Severity::High);
        t.track_error(&e, 0);

        assert!(!t.auto_recover("e1", 100));
        let record = t.record_for_error("e1").unwrap();
        assert_eq!(record.state, RecoveryState::Exhausted);
        // Default retry budget is 3, the fourth candidate never ran.
        assert_eq!(record.attempts, 3);

        // Terminal records reject further attempts.
        assert!(!t.auto_recover("e1", 200));
        assert!(!t.attempt_recovery("e1", "a", 200));
    }

    #[test]
    fn effectiveness_orders_equal_priority_candidates() {
        let mut t = tracker_with(vec![
            Box::new(Scripted::new("flaky", vec![])),
            Box::new(Scripted::new("solid", vec![Ok(()), Ok(())])),
        ]);
        let e1 = error("e1", "x", Category::General, Severity::High);
        t.track_error(&e1, 0);
        // First run: "flaky" tried first (registration order), fails;
        // "solid" succeeds.
        assert!(t.auto_recover("e1", 100));

        let mut e2 = error("e2", "x", Category::General, Severity::High);
        e2.fingerprint = Fingerprint(0x99);
        t.track_error(&e2, 200);
        // Second run: "solid" now has better effectiveness and goes
        // first, recovering on the first attempt.
        assert!(t.auto_recover("e2", 300));
        assert_eq!(t.record_for_error("e2").unwrap().attempts, 1);
    }

    #[test]
    fn cooldown_sidelines_burned_strategy() {
        let mut t = tracker_with(vec![Box::new(Scripted::new("only", vec![]))]);
        let e1 = error("e1", "x", Category::General, Severity::High);
        t.track_error(&e1, 0);
        // Two failed attempts burn the per-strategy budget for this
        // fingerprint.
        assert!(!t.attempt_recovery("e1", "only", 10));
        assert!(!t.attempt_recovery("e1", "only", 20));

        let mut e2 = error("e2", "x", Category::General, Severity::High);
        e2.fingerprint = Fingerprint(0x41);
        t.track_error(&e2, 30);
        // No eligible candidate inside the cooldown window.
        assert!(!t.auto_recover("e2", 40));
        assert_eq!(t.record_for_error("e2").unwrap().attempts, 0);

        // After the cooldown the strategy is eligible again.
        let after = 40 + 5 * 60 * 1000;
        assert!(!t.auto_recover("e2", after));
        assert!(t.record_for_error("e2").unwrap().attempts > 0);
    }

    #[test]
    fn destroy_cancels_in_flight_recovery() {
        let mut t = tracker_with(vec![]);
        let flag = t.cancel_flag();
        t.register_strategy(Box::new(Cancelling(flag))).unwrap();

        let e = error("e1", "x", Category::General, Severity::High);
        t.track_error(&e, 0);

        // The strategy trips the cancel flag before its Ok result can
        // be committed; the pending recovery resolves false.
        assert!(!t.auto_recover("e1", 100));
        assert_eq!(t.active_count(), 0);
        assert!(!t.record_for_error("e1").unwrap().recovered());

        t.destroy();
        t.destroy();
        assert_eq!(t.active_count(), 0);
        assert!(!t.auto_recover("e1", 200));
        assert!(t
            .track_error(&error("e2", "x", Category::General, Severity::High), 200)
            .is_none());
    }

    #[test]
    fn statistics_and_report() {
        let mut t = tracker_with(vec![
            Box::new(Scripted::new("good", vec![Ok(())])),
        ]);
        let e1 = error("e1", "x", Category::Rendering, Severity::High);
        t.track_error(&e1, 0);
        assert!(t.auto_recover("e1", 50));

        let mut e2 = error("e2", "x", Category::Audio, Severity::High);
        e2.fingerprint = Fingerprint(0x77);
        t.track_error(&e2, 100);
        assert!(!t.auto_recover("e2", 150));

        let stats = t.statistics();
        assert_eq!(stats.tracked, 2);
        assert_eq!(stats.recovered, 1);
        assert_eq!(stats.recovery_rate, 0.5);
        assert_eq!(stats.avg_recovery_ms, Some(50.0));

        let report = t.report(ReportScope::Session, 1_000, 0);
        assert_eq!(report.stats.tracked, 2);
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.contains("audio")));
    }
}
