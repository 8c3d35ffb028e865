//! Periodic snapshot acquisition
//!
//! Ticks at a fixed interval, issues each fetch as its own task stamped
//! with a monotonically increasing sequence number, and applies results
//! in completion order. The engine's sequence gate rejects a slow fetch
//! that completes after a newer one has already been merged. Shutdown is
//! immediate: the select loop exits, the ticker drops, and in-flight
//! fetch tasks die with the closed result channel.

use crate::domain::types::RawObservation;
use crate::infra::metrics::Metrics;
use crate::io::snapshot::SnapshotSource;
use crate::services::engine::GateEngine;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::interval;
use tracing::{debug, info, warn};

pub struct PollDriver {
    source: Arc<dyn SnapshotSource>,
    engine: Arc<Mutex<GateEngine>>,
    metrics: Arc<Metrics>,
    poll_interval: Duration,
}

impl PollDriver {
    pub fn new(
        source: Arc<dyn SnapshotSource>,
        engine: Arc<Mutex<GateEngine>>,
        metrics: Arc<Metrics>,
        poll_interval: Duration,
    ) -> Self {
        Self { source, engine, metrics, poll_interval }
    }

    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let (result_tx, mut result_rx) =
            mpsc::channel::<(u64, anyhow::Result<Vec<RawObservation>>)>(16);
        let mut ticker = interval(self.poll_interval);
        let mut next_seq = 0u64;

        info!(interval_ms = self.poll_interval.as_millis() as u64, "poll_driver_started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    next_seq += 1;
                    let seq = next_seq;
                    let source = self.source.clone();
                    let tx = result_tx.clone();
                    tokio::spawn(async move {
                        let result = source.fetch().await;
                        // Receiver gone means the driver shut down
                        let _ = tx.send((seq, result)).await;
                    });
                }
                Some((seq, result)) = result_rx.recv() => {
                    self.handle_result(seq, result);
                }
                _ = shutdown.changed() => {
                    info!("poll_driver_shutdown");
                    break;
                }
            }
        }
    }

    fn handle_result(&self, seq: u64, result: anyhow::Result<Vec<RawObservation>>) {
        match result {
            Ok(observations) => {
                self.metrics.record_poll_ok();
                let applied = self.engine.lock().apply_snapshot(seq, &observations);
                if applied {
                    self.metrics.record_snapshot_applied(observations.len());
                    debug!(seq, gates = observations.len(), "poll_snapshot_merged");
                } else {
                    self.metrics.record_snapshot_stale();
                }
            }
            Err(e) => {
                self.metrics.record_poll_failed();
                self.engine.lock().mark_disconnected();
                warn!(seq, error = %e, "poll_fetch_failed");
            }
        }
    }
}
