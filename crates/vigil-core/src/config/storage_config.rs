//! Persistent storage configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Key the error payload is stored under. Default: "vigil_errors".
    pub storage_key: Option<String>,
    /// Bounded persisted error list. Default: 500.
    pub max_stored_errors: Option<usize>,
    /// Bounded persisted notification list. Default: 100.
    pub max_stored_notifications: Option<usize>,
    /// Entries older than this are removed by cleanup. Default: 7 days.
    pub retention_ms: Option<u64>,
    /// Estimated total byte quota enforced by cleanup. Default: 2 MB.
    pub max_total_bytes: Option<usize>,
}

impl StorageConfig {
    pub fn effective_storage_key(&self) -> &str {
        self.storage_key.as_deref().unwrap_or("vigil_errors")
    }

    pub fn effective_max_stored_errors(&self) -> usize {
        self.max_stored_errors.unwrap_or(500)
    }

    pub fn effective_max_stored_notifications(&self) -> usize {
        self.max_stored_notifications.unwrap_or(100)
    }

    pub fn effective_retention_ms(&self) -> u64 {
        self.retention_ms.unwrap_or(7 * 24 * 60 * 60 * 1000)
    }

    pub fn effective_max_total_bytes(&self) -> usize {
        self.max_total_bytes.unwrap_or(2 * 1024 * 1024)
    }
}
