//! ErrorAnalyzer — one ErrorPattern per fingerprint, created on first
//! sight and incremented afterwards. Trend is recomputed on every
//! occurrence from the share of recent timestamps inside the trend
//! window: >70% recent → Increasing, <30% → Decreasing, else Stable.

use rustc_hash::FxHashMap;
use tracing::debug;

use vigil_core::config::AnalysisConfig;
use vigil_core::models::{ErrorPattern, ErrorRecord, Fingerprint, Trend};

#[derive(Debug)]
struct PatternEntry {
    pattern: ErrorPattern,
    /// Occurrence timestamps, arrival order.
    timestamps: Vec<u64>,
}

#[derive(Debug)]
pub struct ErrorAnalyzer {
    patterns: FxHashMap<Fingerprint, PatternEntry>,
    trend_window_ms: u64,
    pattern_max_age_ms: u64,
}

impl ErrorAnalyzer {
    pub fn new(cfg: &AnalysisConfig) -> Self {
        Self {
            patterns: FxHashMap::default(),
            trend_window_ms: cfg.effective_trend_window_ms(),
            pattern_max_age_ms: cfg.effective_pattern_max_age_ms(),
        }
    }

    /// Record one occurrence and return the updated pattern.
    pub fn analyze(&mut self, record: &ErrorRecord) -> &ErrorPattern {
        let entry = self
            .patterns
            .entry(record.fingerprint)
            .or_insert_with(|| PatternEntry {
                pattern: ErrorPattern::new(record.fingerprint, record.timestamp),
                timestamps: Vec::new(),
            });

        entry.pattern.count += 1;
        entry.pattern.last_seen = record.timestamp;
        entry.pattern.error_ids.push(record.id.clone());
        entry.timestamps.push(record.timestamp);
        entry.pattern.trend = compute_trend(
            &entry.timestamps,
            record.timestamp,
            self.trend_window_ms,
        );

        &entry.pattern
    }

    pub fn pattern(&self, fingerprint: Fingerprint) -> Option<&ErrorPattern> {
        self.patterns.get(&fingerprint).map(|e| &e.pattern)
    }

    /// Current occurrence count for a fingerprint, 0 when unseen.
    pub fn occurrence_count(&self, fingerprint: Fingerprint) -> u64 {
        self.patterns
            .get(&fingerprint)
            .map(|e| e.pattern.count)
            .unwrap_or(0)
    }

    pub fn patterns(&self) -> impl Iterator<Item = &ErrorPattern> {
        self.patterns.values().map(|e| &e.pattern)
    }

    pub fn unique_patterns(&self) -> usize {
        self.patterns.len()
    }

    /// Drop patterns whose last occurrence is older than the retention
    /// window. Returns the number removed.
    pub fn cleanup_stale(&mut self, now: u64) -> usize {
        let max_age = self.pattern_max_age_ms;
        let before = self.patterns.len();
        self.patterns
            .retain(|_, e| now.saturating_sub(e.pattern.last_seen) <= max_age);
        let removed = before - self.patterns.len();
        if removed > 0 {
            debug!(removed, "dropped stale error patterns");
        }
        removed
    }

    /// Patterns by occurrence count, descending.
    pub fn top_patterns(&self, n: usize) -> Vec<&ErrorPattern> {
        let mut all: Vec<&ErrorPattern> = self.patterns().collect();
        all.sort_by(|a, b| b.count.cmp(&a.count));
        all.truncate(n);
        all
    }

    pub fn clear(&mut self) {
        self.patterns.clear();
    }
}

fn compute_trend(timestamps: &[u64], now: u64, window_ms: u64) -> Trend {
    let total = timestamps.len();
    if total < 2 {
        return Trend::Stable;
    }
    let recent = timestamps
        .iter()
        .filter(|&&t| now.saturating_sub(t) < window_ms)
        .count();
    let ratio = recent as f64 / total as f64;
    if ratio > 0.7 {
        Trend::Increasing
    } else if ratio < 0.3 {
        Trend::Decreasing
    } else {
        Trend::Stable
    }
}
