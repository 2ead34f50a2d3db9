//! Report generation and aggregate statistics over the collected
//! errors and their patterns.

use rustc_hash::FxHashMap;
use serde::Serialize;

use vigil_core::models::{Category, ErrorFilter, ErrorRecord, ReportScope, Trend};

use crate::reporter::ErrorReporter;

const RECENT_ERRORS: usize = 10;
const HIGH_FREQUENCY_THRESHOLD: u64 = 10;
const MEMORY_ISSUE_THRESHOLD: usize = 3;

#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    pub scope: ReportScope,
    pub generated_at: u64,
    pub session_id: String,
    pub total_errors: usize,
    pub by_severity: FxHashMap<String, u64>,
    pub by_category: FxHashMap<String, u64>,
    pub unique_patterns: usize,
    pub recent_errors: Vec<ErrorRecord>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PatternSummary {
    pub fingerprint: String,
    pub count: u64,
    pub trend: Trend,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorStatistics {
    pub total_errors: usize,
    pub session_duration_ms: u64,
    pub errors_per_hour: f64,
    pub by_severity: FxHashMap<String, u64>,
    pub by_category: FxHashMap<String, u64>,
    pub top_patterns: Vec<PatternSummary>,
}

impl ErrorReporter {
    pub fn generate_report(&self, scope: ReportScope) -> ErrorReport {
        let now = self.clock.now_ms();
        let cutoff = scope.cutoff(now, self.session_start);
        let errors = self.collector.errors(&ErrorFilter {
            since: Some(cutoff),
            ..Default::default()
        });

        let (by_severity, by_category) = tally(&errors);
        let recent_errors: Vec<ErrorRecord> = errors
            .iter()
            .rev()
            .take(RECENT_ERRORS)
            .rev()
            .map(|e| (*e).clone())
            .collect();

        let mut recommendations = Vec::new();
        if let Some(top) = self.analyzer.top_patterns(1).first() {
            if top.count >= HIGH_FREQUENCY_THRESHOLD {
                recommendations.push(format!(
                    "pattern {} occurred {} times, investigate the underlying cause",
                    top.fingerprint, top.count
                ));
            }
        }
        let memory_errors = errors
            .iter()
            .filter(|e| e.category == Category::Memory)
            .count();
        if memory_errors >= MEMORY_ISSUE_THRESHOLD {
            recommendations.push(format!(
                "{memory_errors} memory errors in scope, consider clearing caches or reducing asset load"
            ));
        }

        ErrorReport {
            scope,
            generated_at: now,
            session_id: self.session_id.clone(),
            total_errors: errors.len(),
            by_severity,
            by_category,
            unique_patterns: self.analyzer.unique_patterns(),
            recent_errors,
            recommendations,
        }
    }

    pub fn error_statistics(&self) -> ErrorStatistics {
        let now = self.clock.now_ms();
        let errors = self.collector.errors(&ErrorFilter::default());
        let (by_severity, by_category) = tally(&errors);

        let session_duration_ms = now.saturating_sub(self.session_start);
        let errors_per_hour = if session_duration_ms == 0 {
            0.0
        } else {
            errors.len() as f64 * 3_600_000.0 / session_duration_ms as f64
        };

        let top_patterns = self
            .analyzer
            .top_patterns(5)
            .into_iter()
            .map(|p| PatternSummary {
                fingerprint: p.fingerprint.to_string(),
                count: p.count,
                trend: p.trend,
            })
            .collect();

        ErrorStatistics {
            total_errors: errors.len(),
            session_duration_ms,
            errors_per_hour,
            by_severity,
            by_category,
            top_patterns,
        }
    }
}

fn tally(errors: &[&ErrorRecord]) -> (FxHashMap<String, u64>, FxHashMap<String, u64>) {
    let mut by_severity: FxHashMap<String, u64> = FxHashMap::default();
    let mut by_category: FxHashMap<String, u64> = FxHashMap::default();
    for e in errors {
        *by_severity.entry(e.severity.to_string()).or_insert(0) += 1;
        *by_category.entry(e.category.to_string()).or_insert(0) += 1;
    }
    (by_severity, by_category)
}
