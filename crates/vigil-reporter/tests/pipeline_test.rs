//! End-to-end pipeline behavior through the public reporter surface.

use std::sync::Arc;

use vigil_core::clock::ManualClock;
use vigil_core::config::VigilConfig;
use vigil_core::errors::{RecoveryError, SnapshotError};
use vigil_core::models::{Category, ErrorFilter, ReportScope, RuntimeState, Severity};
use vigil_core::traits::{GameRuntime, MemoryKvStore, RenderSurface};
use vigil_core::FxHashMap;
use vigil_reporter::ErrorReporter;
use vigil_storage::FileKvStore;

/// Runtime whose state reports a running game and whose hooks can be
/// scripted to succeed or fail wholesale.
struct TestRuntime {
    hooks_succeed: bool,
}

impl GameRuntime for TestRuntime {
    fn state(&self) -> RuntimeState {
        RuntimeState {
            scene: Some("arena".into()),
            entity_count: 12,
            score: 400,
            running: true,
            paused: false,
        }
    }

    fn reset_surface(&self) -> Result<(), RecoveryError> {
        self.hook("reset_surface")
    }

    fn clear_cache(&self) -> Result<(), RecoveryError> {
        self.hook("clear_cache")
    }

    fn reload_scene(&self) -> Result<(), RecoveryError> {
        self.hook("reload_scene")
    }
}

impl TestRuntime {
    fn hook(&self, name: &str) -> Result<(), RecoveryError> {
        if self.hooks_succeed {
            Ok(())
        } else {
            Err(RecoveryError::StrategyFailed {
                strategy: name.to_string(),
                message: "scripted failure".into(),
            })
        }
    }
}

struct FixedSurface;

impl RenderSurface for FixedSurface {
    fn capture(&self) -> Result<String, SnapshotError> {
        Ok("data:image/png;base64,AAAA".into())
    }
}

fn init_logs() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn reporter_at(cfg: VigilConfig, clock: &ManualClock, hooks_succeed: bool) -> ErrorReporter {
    init_logs();
    ErrorReporter::new(
        cfg,
        Box::new(MemoryKvStore::new()),
        Arc::new(TestRuntime { hooks_succeed }),
        Box::new(clock.clone()),
    )
}

fn critical_context() -> FxHashMap<String, serde_json::Value> {
    let mut ctx = FxHashMap::default();
    ctx.insert("critical".into(), serde_json::Value::Bool(true));
    ctx
}

#[test]
fn fingerprints_collapse_numeric_noise() {
    let clock = ManualClock::at(1_000_000);
    let mut reporter = reporter_at(VigilConfig::default(), &clock, false);

    let a = reporter.handle_error("request 4012 failed with timeout", None, FxHashMap::default());
    let b = reporter.handle_error("request 77 failed with timeout", None, FxHashMap::default());
    let c = reporter.handle_error("texture upload failed", None, FxHashMap::default());

    assert_eq!(a.fingerprint, b.fingerprint);
    assert_ne!(a.fingerprint, c.fingerprint);
    assert_eq!(a.category, Category::Network);
}

#[test]
fn pattern_counts_grow_monotonically() {
    let clock = ManualClock::at(1_000_000);
    let mut reporter = reporter_at(VigilConfig::default(), &clock, false);

    for _ in 0..3 {
        reporter.handle_error("shader compile failed", None, FxHashMap::default());
        clock.advance(10);
    }

    let stats = reporter.error_statistics();
    assert_eq!(stats.total_errors, 3);
    assert_eq!(stats.top_patterns[0].count, 3);
    assert_eq!(stats.by_category.get("rendering"), Some(&3));
}

#[test]
fn snapshots_follow_the_severity_threshold() {
    let clock = ManualClock::at(1_000_000);
    let mut reporter = reporter_at(VigilConfig::default(), &clock, false);
    reporter.set_surface(Box::new(FixedSurface));

    let low = reporter.handle_error("minor hiccup", None, FxHashMap::default());
    assert_eq!(low.severity, Severity::Low);
    assert!(low.snapshot_id.is_none());

    let critical = reporter.handle_error("minor hiccup", None, critical_context());
    assert_eq!(critical.severity, Severity::Critical);
    let snapshot_id = critical.snapshot_id.expect("critical errors capture");
    assert_eq!(reporter.snapshot(&snapshot_id).unwrap().error_id, critical.id);
}

#[test]
fn rate_limit_window_recovers_after_advance() {
    let clock = ManualClock::at(1_000_000);
    let cfg = VigilConfig::from_toml_str(
        r#"
        [notify]
        max_per_minute = 2
        "#,
    )
    .unwrap();
    let mut reporter = reporter_at(cfg, &clock, false);

    // Critical errors dispatch immediately, so history length counts
    // issued notifications.
    for _ in 0..3 {
        reporter.handle_error("boom", None, critical_context());
    }
    assert_eq!(reporter.notifications().len(), 2);

    clock.advance(60_000);
    reporter.handle_error("boom", None, critical_context());
    assert_eq!(reporter.notifications().len(), 3);
}

#[test]
fn medium_errors_wait_for_their_threshold() {
    let clock = ManualClock::at(1_000_000);
    let mut reporter = reporter_at(VigilConfig::default(), &clock, false);

    let mut ctx = FxHashMap::default();
    ctx.insert("type".into(), serde_json::json!("unhandled_rejection"));

    for _ in 0..4 {
        let rec = reporter.handle_error("promise rejected", None, ctx.clone());
        assert_eq!(rec.severity, Severity::Medium);
    }
    // Four occurrences: below the default threshold of five, nothing
    // queued or issued.
    assert!(reporter.notifications().is_empty());
    assert_eq!(reporter.notification_statistics().pending_groups, 0);

    reporter.handle_error("promise rejected", None, ctx.clone());
    assert_eq!(reporter.notification_statistics().pending_groups, 1);

    // The aggregation window closes and the group flushes.
    clock.advance(60_000);
    reporter.tick();
    assert_eq!(reporter.notifications().len(), 1);
}

#[test]
fn aggregation_folds_but_critical_bypasses() {
    let clock = ManualClock::at(1_000_000);
    let mut reporter = reporter_at(VigilConfig::default(), &clock, false);

    // Four occurrences of one high-severity error: the first two sit
    // below the high threshold of three, the third and fourth clear it
    // and land in the same aggregation window.
    for _ in 0..4 {
        let rec = reporter.handle_error("type error in render pass", None, FxHashMap::default());
        assert_eq!(rec.severity, Severity::High);
        clock.advance(1_000);
    }
    // And a critical error, which must dispatch on its own.
    reporter.handle_error("boom", None, critical_context());

    assert_eq!(reporter.notifications().len(), 1);
    assert!(reporter.notifications()[0].aggregated.is_none());

    clock.advance(60_000);
    reporter.tick();

    let notifications = reporter.notifications();
    assert_eq!(notifications.len(), 2);
    let folded = notifications
        .iter()
        .find(|n| n.aggregated.is_some())
        .expect("high errors aggregate");
    assert_eq!(folded.aggregated.as_ref().unwrap().count, 2);
}

#[test]
fn critical_errors_auto_recover_when_hooks_work() {
    let clock = ManualClock::at(1_000_000);
    let mut reporter = reporter_at(VigilConfig::default(), &clock, true);

    let mut ctx = critical_context();
    ctx.insert("type".into(), serde_json::json!("rendering"));
    let record = reporter.handle_error("canvas context lost", None, ctx);

    assert_eq!(record.recovered_by.as_deref(), Some("canvas-reset"));
    let stats = reporter.recovery_statistics();
    assert_eq!(stats.recovered, 1);
    assert_eq!(stats.recovery_rate, 1.0);
}

#[test]
fn failed_hooks_exhaust_the_retry_budget() {
    let clock = ManualClock::at(1_000_000);
    let mut reporter = reporter_at(VigilConfig::default(), &clock, false);

    let record = reporter.handle_error("canvas context lost", None, critical_context());
    assert!(record.recovered_by.is_none());

    let stats = reporter.recovery_statistics();
    assert_eq!(stats.recovered, 0);
    assert!(stats.total_attempts >= 1);
}

#[test]
fn storage_quota_is_never_fatal() {
    init_logs();
    let clock = ManualClock::at(1_000_000);
    let mut reporter = ErrorReporter::new(
        VigilConfig::default(),
        Box::new(MemoryKvStore::with_quota(8_000)),
        Arc::new(TestRuntime { hooks_succeed: false }),
        Box::new(clock.clone()),
    );

    for i in 0..40 {
        reporter.handle_error(&format!("overflow probe {i}"), None, FxHashMap::default());
        clock.advance(5);
    }

    // Ingestion survived; the persisted set kept the newest entries.
    let persisted = reporter.persisted_errors();
    assert!(!persisted.is_empty());
    assert_eq!(reporter.error_statistics().total_errors, 40);
}

#[test]
fn destroy_is_idempotent_and_stops_processing() {
    let clock = ManualClock::at(1_000_000);
    let mut reporter = reporter_at(VigilConfig::default(), &clock, false);

    reporter.handle_error("boom", None, critical_context());
    assert_eq!(reporter.notifications().len(), 1);

    reporter.destroy();
    reporter.destroy();

    let after = reporter.handle_error("boom", None, critical_context());
    // The record is still synthesized for the caller.
    assert_eq!(after.severity, Severity::Critical);
    // But nothing new was processed.
    assert_eq!(reporter.notifications().len(), 1);
    assert_eq!(reporter.error_statistics().total_errors, 1);
}

#[test]
fn acknowledge_error_flags_the_collected_record() {
    let clock = ManualClock::at(1_000_000);
    let mut reporter = reporter_at(VigilConfig::default(), &clock, false);

    let record = reporter.handle_error("boom", None, critical_context());
    assert!(reporter.acknowledge_error(&record.id));
    let history = reporter.error_history(&ErrorFilter::default());
    assert!(history.iter().any(|e| e.id == record.id && e.acknowledged));

    // Unknown ids are rejected, for acknowledgement and recovery alike.
    assert!(!reporter.acknowledge_error("err_missing"));
    assert!(!reporter.recover("err_missing"));
}

#[test]
fn settings_survive_across_sessions() {
    init_logs();
    let dir = tempfile::tempdir().unwrap();
    let clock = ManualClock::at(1_000_000);

    let mut first = ErrorReporter::new(
        VigilConfig::default(),
        Box::new(FileKvStore::open(dir.path()).unwrap()),
        Arc::new(TestRuntime { hooks_succeed: false }),
        Box::new(clock.clone()),
    );
    first.update_settings(&serde_json::json!({ "max_per_minute": 1 }));
    first.destroy();

    let mut second = ErrorReporter::new(
        VigilConfig::default(),
        Box::new(FileKvStore::open(dir.path()).unwrap()),
        Arc::new(TestRuntime { hooks_succeed: false }),
        Box::new(clock.clone()),
    );
    second.handle_error("boom", None, critical_context());
    second.handle_error("boom", None, critical_context());
    // The persisted one-per-minute limit applies to the new session.
    assert_eq!(second.notifications().len(), 1);
}

#[test]
fn reports_cover_scope_and_recommend() {
    let clock = ManualClock::at(10_000_000);
    let mut reporter = reporter_at(VigilConfig::default(), &clock, false);

    for _ in 0..12 {
        reporter.handle_error("memory allocation failed", None, FxHashMap::default());
        clock.advance(1_000);
    }

    let report = reporter.generate_report(ReportScope::Session);
    assert_eq!(report.total_errors, 12);
    assert_eq!(report.by_category.get("memory"), Some(&12));
    assert_eq!(report.unique_patterns, 1);
    assert_eq!(report.recent_errors.len(), 10);
    assert!(report.recommendations.iter().any(|r| r.contains("memory")));
    assert!(report
        .recommendations
        .iter()
        .any(|r| r.contains("occurred 12 times")));

    // An hour later the last-hour scope still sees them, a day scope too.
    let hour_report = reporter.generate_report(ReportScope::LastHour);
    assert_eq!(hour_report.total_errors, 12);

    let filtered = reporter.error_history(&ErrorFilter {
        category: Some(Category::Memory),
        ..Default::default()
    });
    assert_eq!(filtered.len(), 12);
}
