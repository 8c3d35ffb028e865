//! Lock-free polling metrics
//!
//! Counters use atomics so the poll driver never contends with the
//! reporter. All atomics use Relaxed ordering intentionally—these are
//! statistical counters only, never used for coordination.

use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

#[derive(Debug, Default)]
pub struct Metrics {
    polls_ok: AtomicU64,
    polls_failed: AtomicU64,
    snapshots_applied: AtomicU64,
    snapshots_stale: AtomicU64,
    observations_total: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_poll_ok(&self) {
        self.polls_ok.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_poll_failed(&self) {
        self.polls_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_snapshot_applied(&self, observations: usize) {
        self.snapshots_applied.fetch_add(1, Ordering::Relaxed);
        self.observations_total.fetch_add(observations as u64, Ordering::Relaxed);
    }

    /// A fetch completed after a newer one was already merged
    pub fn record_snapshot_stale(&self) {
        self.snapshots_stale.fetch_add(1, Ordering::Relaxed);
    }

    pub fn polls_ok(&self) -> u64 {
        self.polls_ok.load(Ordering::Relaxed)
    }

    pub fn polls_failed(&self) -> u64 {
        self.polls_failed.load(Ordering::Relaxed)
    }

    pub fn snapshots_applied(&self) -> u64 {
        self.snapshots_applied.load(Ordering::Relaxed)
    }

    pub fn snapshots_stale(&self) -> u64 {
        self.snapshots_stale.load(Ordering::Relaxed)
    }

    /// Log a periodic summary with current engine counts
    pub fn report(&self, known_gates: usize, connected: bool) {
        info!(
            polls_ok = self.polls_ok(),
            polls_failed = self.polls_failed(),
            snapshots_applied = self.snapshots_applied(),
            snapshots_stale = self.snapshots_stale(),
            observations_total = self.observations_total.load(Ordering::Relaxed),
            known_gates,
            connected,
            "metrics_report"
        );
    }
}
