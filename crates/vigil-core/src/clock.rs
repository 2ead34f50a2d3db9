//! Clock and timer abstractions.
//!
//! The pipeline runs in a single cooperative context: nothing fires on
//! its own. Components hold a [`TimerSet`] of deadlines and poll it with
//! an explicit `now`; `destroy()` clears the set so no callback can
//! outlive its owner.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the current time in epoch milliseconds.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// Hand-driven clock for tests. Clones share the same underlying time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock(Arc<AtomicU64>);

impl ManualClock {
    pub fn at(now_ms: u64) -> Self {
        Self(Arc::new(AtomicU64::new(now_ms)))
    }

    pub fn advance(&self, delta_ms: u64) {
        self.0.fetch_add(delta_ms, Ordering::SeqCst);
    }

    pub fn set(&self, now_ms: u64) {
        self.0.store(now_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Cancellable timer handle. Opaque; comparing handles from different
/// `TimerSet`s is meaningless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// Deadline registry. `schedule` stores a deadline with a tag, `due`
/// removes and returns everything that has elapsed, `cancel` removes a
/// single entry, `clear` removes all of them.
#[derive(Debug)]
pub struct TimerSet<T> {
    next_id: u64,
    entries: Vec<(TimerHandle, u64, T)>,
}

impl<T> Default for TimerSet<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<T> TimerSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: u64, after_ms: u64, tag: T) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.entries.push((handle, now.saturating_add(after_ms), tag));
        handle
    }

    /// Drain every entry whose deadline has passed, in deadline order.
    pub fn due(&mut self, now: u64) -> Vec<(TimerHandle, T)> {
        let mut fired = Vec::new();
        let mut remaining = Vec::with_capacity(self.entries.len());
        for (handle, deadline, tag) in self.entries.drain(..) {
            if deadline <= now {
                fired.push((handle, deadline, tag));
            } else {
                remaining.push((handle, deadline, tag));
            }
        }
        self.entries = remaining;
        fired.sort_by_key(|(_, deadline, _)| *deadline);
        fired.into_iter().map(|(h, _, t)| (h, t)).collect()
    }

    /// Returns true if the handle was pending.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(h, _, _)| *h != handle);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn pending(&self) -> usize {
        self.entries.len()
    }
}
