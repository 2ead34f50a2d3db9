//! SnapshotCapture — best-effort visual captures for severe errors,
//! held in a bounded in-memory cache. Every failure path degrades to
//! "no snapshot"; nothing here can fail an ingestion.

use tracing::{debug, warn};

use vigil_core::config::SnapshotConfig;
use vigil_core::errors::SnapshotError;
use vigil_core::ids;
use vigil_core::models::{ErrorRecord, Snapshot, SnapshotFilter};
use vigil_core::traits::RenderSurface;

pub struct SnapshotCapture {
    cfg: SnapshotConfig,
    surface: Option<Box<dyn RenderSurface>>,
    /// Oldest first.
    snapshots: Vec<Snapshot>,
    total_bytes: usize,
}

impl SnapshotCapture {
    pub fn new(cfg: SnapshotConfig) -> Self {
        Self {
            cfg,
            surface: None,
            snapshots: Vec::new(),
            total_bytes: 0,
        }
    }

    pub fn set_surface(&mut self, surface: Box<dyn RenderSurface>) {
        self.surface = Some(surface);
    }

    /// Capture a snapshot for the error if it clears the severity
    /// threshold. Returns the snapshot id, or None on any veto or
    /// failure.
    pub fn capture(&mut self, error: &ErrorRecord, now: u64) -> Option<String> {
        if !self.cfg.effective_enabled() {
            return None;
        }
        if error.severity < self.cfg.effective_capture_threshold() {
            return None;
        }
        let surface = match self.surface.as_ref() {
            Some(surface) => surface,
            None => {
                debug!(error_id = %error.id, error = %SnapshotError::Unavailable, "no snapshot");
                return None;
            }
        };

        let payload = match surface.capture() {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error_id = %error.id, error = %e, "snapshot capture failed");
                return None;
            }
        };

        let size = payload.len();
        let max_single = self.cfg.effective_max_single_bytes();
        if size > max_single {
            let e = SnapshotError::TooLarge {
                size,
                limit: max_single,
            };
            warn!(error_id = %error.id, error = %e, "snapshot rejected");
            return None;
        }

        // Oldest snapshots yield until count and byte budgets fit.
        let max_snapshots = self.cfg.effective_max_snapshots();
        let max_bytes = self.cfg.effective_max_storage_bytes();
        while !self.snapshots.is_empty()
            && (self.snapshots.len() >= max_snapshots || self.total_bytes + size > max_bytes)
        {
            let evicted = self.snapshots.remove(0);
            self.total_bytes -= evicted.size_bytes;
            debug!(snapshot_id = %evicted.id, "evicted snapshot");
        }

        let snapshot = Snapshot {
            id: ids::snapshot_id(),
            timestamp: now,
            payload,
            size_bytes: size,
            error_id: error.id.clone(),
            error_message: error.message.clone(),
        };
        let id = snapshot.id.clone();
        self.total_bytes += size;
        self.snapshots.push(snapshot);
        Some(id)
    }

    pub fn get(&self, id: &str) -> Option<&Snapshot> {
        self.snapshots.iter().find(|s| s.id == id)
    }

    pub fn snapshots(&self, filter: &SnapshotFilter) -> Vec<&Snapshot> {
        self.snapshots.iter().filter(|s| filter.matches(s)).collect()
    }

    pub fn delete(&mut self, id: &str) -> bool {
        match self.snapshots.iter().position(|s| s.id == id) {
            Some(pos) => {
                let removed = self.snapshots.remove(pos);
                self.total_bytes -= removed.size_bytes;
                true
            }
            None => false,
        }
    }

    /// Drop snapshots past the configured maximum age.
    pub fn clear_old(&mut self, now: u64) -> usize {
        let max_age = self.cfg.effective_max_age_ms();
        let before = self.snapshots.len();
        self.snapshots
            .retain(|s| now.saturating_sub(s.timestamp) <= max_age);
        self.total_bytes = self.snapshots.iter().map(|s| s.size_bytes).sum();
        before - self.snapshots.len()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.total_bytes = 0;
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }
}
