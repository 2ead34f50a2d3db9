//! Aggregation windows. Errors sharing a category and severity fold
//! into one group with a flush deadline; flushing a single-entry group
//! produces a plain notification, anything larger a summary. Critical
//! errors never enter a group, the system dispatches them directly.

use rustc_hash::FxHashMap;
use tracing::debug;

use vigil_core::clock::{TimerHandle, TimerSet};
use vigil_core::ids;
use vigil_core::models::{
    AggregatedInfo, Category, ErrorRecord, Fingerprint, NotificationRecord, Severity,
};

const MAX_GROUP_MESSAGES: usize = 3;

type GroupKey = (Category, Severity);

#[derive(Debug)]
struct Group {
    count: u64,
    first_seen: u64,
    last_seen: u64,
    error_ids: Vec<String>,
    /// Distinct constituent messages, capped at MAX_GROUP_MESSAGES.
    messages: Vec<String>,
    first_error_id: String,
    first_message: String,
    fingerprint: Fingerprint,
    occurrence_count: u64,
    timer: TimerHandle,
}

#[derive(Debug)]
pub struct Aggregator {
    window_ms: u64,
    groups: FxHashMap<GroupKey, Group>,
    timers: TimerSet<GroupKey>,
}

impl Aggregator {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            groups: FxHashMap::default(),
            timers: TimerSet::new(),
        }
    }

    pub fn set_window_ms(&mut self, window_ms: u64) {
        self.window_ms = window_ms;
    }

    /// Fold an error into its group, opening the group (and its flush
    /// deadline) on first sight.
    pub fn add(&mut self, error: &ErrorRecord, pattern_count: u64, now: u64) {
        let key = (error.category, error.severity);
        match self.groups.get_mut(&key) {
            Some(group) => {
                group.count += 1;
                group.last_seen = now;
                group.error_ids.push(error.id.clone());
                group.occurrence_count = group.occurrence_count.max(pattern_count);
                if group.messages.len() < MAX_GROUP_MESSAGES
                    && !group.messages.contains(&error.message)
                {
                    group.messages.push(error.message.clone());
                }
            }
            None => {
                let timer = self.timers.schedule(now, self.window_ms, key);
                debug!(
                    category = %error.category,
                    severity = %error.severity,
                    "opened aggregation group"
                );
                self.groups.insert(
                    key,
                    Group {
                        count: 1,
                        first_seen: now,
                        last_seen: now,
                        error_ids: vec![error.id.clone()],
                        messages: vec![error.message.clone()],
                        first_error_id: error.id.clone(),
                        first_message: error.message.clone(),
                        fingerprint: error.fingerprint,
                        occurrence_count: pattern_count,
                        timer,
                    },
                );
            }
        }
    }

    /// Flush every group whose window has elapsed.
    pub fn flush_due(&mut self, now: u64) -> Vec<NotificationRecord> {
        let mut flushed = Vec::new();
        for (_, key) in self.timers.due(now) {
            if let Some(group) = self.groups.remove(&key) {
                flushed.push(build_notification(key, group, now));
            }
        }
        flushed
    }

    /// Flush everything regardless of deadlines.
    pub fn flush_all(&mut self, now: u64) -> Vec<NotificationRecord> {
        self.timers.clear();
        let mut keys: Vec<GroupKey> = self.groups.keys().copied().collect();
        keys.sort_by_key(|(_, severity)| std::cmp::Reverse(*severity));
        keys.into_iter()
            .filter_map(|key| {
                self.groups
                    .remove(&key)
                    .map(|group| build_notification(key, group, now))
            })
            .collect()
    }

    /// Drop all pending groups without dispatching them.
    pub fn clear(&mut self) {
        for (_, group) in self.groups.drain() {
            self.timers.cancel(group.timer);
        }
        self.timers.clear();
    }

    pub fn pending_groups(&self) -> usize {
        self.groups.len()
    }
}

fn build_notification(key: GroupKey, group: Group, now: u64) -> NotificationRecord {
    let (category, severity) = key;
    if group.count == 1 {
        NotificationRecord {
            id: ids::notification_id(),
            timestamp: now,
            error_id: Some(group.first_error_id),
            message: group.first_message,
            severity,
            category,
            fingerprint: Some(group.fingerprint),
            occurrence_count: group.occurrence_count,
            channels: Vec::new(),
            acknowledged: false,
            aggregated: None,
        }
    } else {
        NotificationRecord {
            id: ids::notification_id(),
            timestamp: now,
            error_id: None,
            message: format!("{} {} errors ({})", group.count, category, severity),
            severity,
            category,
            fingerprint: Some(group.fingerprint),
            occurrence_count: group.occurrence_count,
            channels: Vec::new(),
            acknowledged: false,
            aggregated: Some(AggregatedInfo {
                count: group.count,
                first_seen: group.first_seen,
                last_seen: group.last_seen,
                error_ids: group.error_ids,
                messages: group.messages,
            }),
        }
    }
}
