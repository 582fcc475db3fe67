//! Process-wide counters for the click recording path.
//!
//! Recording failures never reach the visitor, so these counters (exposed on
//! `/health` and mirrored to the `metrics` facade) together with the `tracing`
//! logs are the only place a lost click becomes visible.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Outcome counters shared by the dispatcher and the background worker.
#[derive(Debug, Default)]
pub struct ClickCounters {
    recorded: AtomicU64,
    failed: AtomicU64,
    dropped: AtomicU64,
}

/// Point-in-time copy of [`ClickCounters`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClickCountersSnapshot {
    pub recorded: u64,
    pub failed: u64,
    pub dropped: u64,
}

impl ClickCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// A click reached the store.
    pub fn record_success(&self) {
        self.recorded.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("clicks_recorded_total").increment(1);
    }

    /// A click write failed after all attempts.
    pub fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("clicks_failed_total").increment(1);
    }

    /// A click was discarded before a write was attempted (queue full or closed).
    pub fn record_drop(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("clicks_dropped_total").increment(1);
    }

    pub fn snapshot(&self) -> ClickCountersSnapshot {
        ClickCountersSnapshot {
            recorded: self.recorded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}
