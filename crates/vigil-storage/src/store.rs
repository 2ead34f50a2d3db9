//! ErrorStorage — single owner of the key-value capability. Everything
//! lives in one JSON document under a fixed key; writes that hit the
//! quota evict the oldest half and retry once, any remaining failure is
//! logged and swallowed.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use vigil_core::config::StorageConfig;
use vigil_core::errors::StorageError;
use vigil_core::models::{ErrorRecord, NotificationRecord};
use vigil_core::traits::KeyValueStore;

/// The persisted document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct StoredData {
    errors: Vec<ErrorRecord>,
    notifications: Vec<NotificationRecord>,
    sessions: Vec<SessionMeta>,
    last_updated: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMeta {
    pub session_id: String,
    pub started_at: u64,
}

pub struct ErrorStorage {
    kv: Box<dyn KeyValueStore>,
    cfg: StorageConfig,
}

impl ErrorStorage {
    pub fn new(kv: Box<dyn KeyValueStore>, cfg: StorageConfig) -> Self {
        Self { kv, cfg }
    }

    /// Persist an error record. Never fails outward.
    pub fn store(&mut self, record: &ErrorRecord, now: u64) {
        let max = self.cfg.effective_max_stored_errors();
        self.mutate(now, |data| {
            data.errors.push(record.clone());
            if data.errors.len() > max {
                let excess = data.errors.len() - max;
                data.errors.drain(..excess);
            }
        });
    }

    /// Persist a notification record. Never fails outward.
    pub fn store_notification(&mut self, record: &NotificationRecord, now: u64) {
        let max = self.cfg.effective_max_stored_notifications();
        self.mutate(now, |data| {
            data.notifications.push(record.clone());
            if data.notifications.len() > max {
                let excess = data.notifications.len() - max;
                data.notifications.drain(..excess);
            }
        });
    }

    /// Record session metadata once per session.
    pub fn record_session(&mut self, session_id: &str, started_at: u64) {
        let session_id = session_id.to_string();
        self.mutate(started_at, |data| {
            if !data.sessions.iter().any(|s| s.session_id == session_id) {
                data.sessions.push(SessionMeta {
                    session_id,
                    started_at,
                });
            }
        });
    }

    /// Errors persisted for the given session.
    pub fn load_session(&self, session_id: &str) -> Vec<ErrorRecord> {
        self.load()
            .errors
            .into_iter()
            .filter(|e| e.session_id == session_id)
            .collect()
    }

    pub fn stored_errors(&self) -> Vec<ErrorRecord> {
        self.load().errors
    }

    pub fn stored_notifications(&self) -> Vec<NotificationRecord> {
        self.load().notifications
    }

    /// Remove entries older than the retention window, then evict
    /// oldest-first until the estimated size fits the byte quota.
    pub fn cleanup(&mut self, now: u64) {
        let retention = self.cfg.effective_retention_ms();
        let quota = self.cfg.effective_max_total_bytes();
        let mut data = self.load();

        data.errors
            .retain(|e| now.saturating_sub(e.timestamp) <= retention);
        data.notifications
            .retain(|n| now.saturating_sub(n.timestamp) <= retention);

        while estimated_size(&data) > quota && !data.errors.is_empty() {
            data.errors.remove(0);
        }
        while estimated_size(&data) > quota && !data.notifications.is_empty() {
            data.notifications.remove(0);
        }

        data.last_updated = now;
        if let Err(e) = self.save(&data) {
            warn!(error = %e, "storage cleanup write failed");
        }
    }

    /// Estimated byte size of the persisted document.
    pub fn estimated_size(&self) -> usize {
        estimated_size(&self.load())
    }

    /// Persist an opaque settings document next to the data key.
    pub fn save_settings(&mut self, settings: &serde_json::Value) {
        let key = self.settings_key();
        match serde_json::to_string(settings) {
            Ok(payload) => {
                if let Err(e) = self.kv.set(&key, &payload) {
                    warn!(error = %e, "failed to save settings");
                }
            }
            Err(e) => warn!(error = %e, "failed to serialize settings"),
        }
    }

    pub fn load_settings(&self) -> Option<serde_json::Value> {
        let key = self.settings_key();
        match self.kv.get(&key) {
            Ok(Some(payload)) => serde_json::from_str(&payload)
                .map_err(|e| warn!(error = %e, "corrupt settings document"))
                .ok(),
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "failed to load settings");
                None
            }
        }
    }

    fn settings_key(&self) -> String {
        format!("{}_settings", self.cfg.effective_storage_key())
    }

    /// Load, apply a mutation, and save with one quota-eviction retry.
    fn mutate(&mut self, now: u64, apply: impl FnOnce(&mut StoredData)) {
        let mut data = self.load();
        apply(&mut data);
        data.last_updated = now;

        match self.save(&data) {
            Ok(()) => {}
            Err(e) if e.is_quota_exceeded() => {
                debug!("storage quota exceeded, evicting oldest half and retrying");
                let keep_errors = data.errors.len() / 2;
                let keep_notifications = data.notifications.len() / 2;
                data.errors.drain(..data.errors.len() - keep_errors);
                data.notifications
                    .drain(..data.notifications.len() - keep_notifications);
                if let Err(e) = self.save(&data) {
                    warn!(error = %e, "storage write failed after eviction, skipping persist");
                }
            }
            Err(e) => warn!(error = %e, "storage write failed, skipping persist"),
        }
    }

    fn load(&self) -> StoredData {
        let key = self.cfg.effective_storage_key();
        match self.kv.get(key) {
            Ok(Some(payload)) => serde_json::from_str(&payload).unwrap_or_else(|e| {
                warn!(error = %e, "corrupt storage document, starting fresh");
                StoredData::default()
            }),
            Ok(None) => StoredData::default(),
            Err(e) => {
                warn!(error = %e, "storage read failed, starting fresh");
                StoredData::default()
            }
        }
    }

    fn save(&mut self, data: &StoredData) -> Result<(), StorageError> {
        let payload = serde_json::to_string(data)?;
        self.kv.set(self.cfg.effective_storage_key(), &payload)
    }
}

fn estimated_size(data: &StoredData) -> usize {
    serde_json::to_string(data).map(|s| s.len()).unwrap_or(0)
}
