//! ErrorCollector — bounded append-only store of raw error records with
//! filter-based retrieval. Oldest records are trimmed past the cap.

use vigil_core::config::AnalysisConfig;
use vigil_core::models::{ErrorFilter, ErrorRecord};

#[derive(Debug)]
pub struct ErrorCollector {
    records: Vec<ErrorRecord>,
    max_errors: usize,
}

impl ErrorCollector {
    pub fn new(cfg: &AnalysisConfig) -> Self {
        Self {
            records: Vec::new(),
            max_errors: cfg.effective_max_errors(),
        }
    }

    /// Append a record, trimming the oldest when over capacity.
    /// Returns the record's id.
    pub fn collect(&mut self, record: ErrorRecord) -> String {
        let id = record.id.clone();
        self.records.push(record);
        if self.records.len() > self.max_errors {
            let excess = self.records.len() - self.max_errors;
            self.records.drain(..excess);
        }
        id
    }

    /// Filtered view of the collected records, oldest first.
    pub fn errors(&self, filter: &ErrorFilter) -> Vec<&ErrorRecord> {
        self.records.iter().filter(|r| filter.matches(r)).collect()
    }

    pub fn get(&self, id: &str) -> Option<&ErrorRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut ErrorRecord> {
        self.records.iter_mut().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The most recent `n` records, oldest first.
    pub fn recent(&self, n: usize) -> &[ErrorRecord] {
        let start = self.records.len().saturating_sub(n);
        &self.records[start..]
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::models::{Category, Fingerprint, Severity};
    use vigil_core::FxHashMap;

    fn record(id: &str, severity: Severity, timestamp: u64) -> ErrorRecord {
        ErrorRecord {
            id: id.into(),
            message: "m".into(),
            stack: None,
            severity,
            category: Category::General,
            fingerprint: Fingerprint(0),
            timestamp,
            session_id: "s".into(),
            context: FxHashMap::default(),
            snapshot_id: None,
            acknowledged: false,
            recovered_by: None,
        }
    }

    fn collector(max: usize) -> ErrorCollector {
        ErrorCollector::new(&AnalysisConfig {
            max_errors: Some(max),
            ..Default::default()
        })
    }

    #[test]
    fn collect_returns_id() {
        let mut c = collector(10);
        assert_eq!(c.collect(record("err_1", Severity::Low, 1)), "err_1");
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn oldest_trimmed_past_capacity() {
        let mut c = collector(3);
        for i in 0..5 {
            c.collect(record(&format!("err_{i}"), Severity::Low, i));
        }
        assert_eq!(c.len(), 3);
        assert!(c.get("err_0").is_none());
        assert!(c.get("err_1").is_none());
        assert!(c.get("err_4").is_some());
    }

    #[test]
    fn filter_retrieval_has_no_side_effects() {
        let mut c = collector(10);
        c.collect(record("a", Severity::High, 10));
        c.collect(record("b", Severity::Low, 20));

        let high = c.errors(&ErrorFilter {
            severity: Some(Severity::High),
            ..Default::default()
        });
        assert_eq!(high.len(), 1);
        assert_eq!(high[0].id, "a");
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn recent_returns_tail() {
        let mut c = collector(10);
        for i in 0..4 {
            c.collect(record(&format!("err_{i}"), Severity::Low, i));
        }
        let tail = c.recent(2);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].id, "err_2");
        assert_eq!(tail[1].id, "err_3");
    }
}
