//! Snapshot merging and view derivation
//!
//! Each polling cycle delivers an arbitrarily-ordered set of gate
//! observations. The merger retains the latest reading per gate,
//! reconciles the display order, and rebuilds the annotated view in a
//! single O(n) pass over the current ordering. Gates absent from a
//! snapshot keep their last-known metrics frozen; a malformed record for
//! one gate never blocks updates to the others.

use crate::domain::types::{
    ActivityClass, ActivityThresholds, GateId, GateView, RawObservation,
};
use crate::services::order::OrderTracker;
use rustc_hash::FxHashMap;
use tracing::warn;

/// Latest accepted reading for one gate
#[derive(Debug, Clone)]
struct GateRecord {
    triggered_at_ms: u64,
    since_last_trigger_secs: f64,
    /// Set when the most recent observation for this gate was unparsable;
    /// forces the activity class to `Stale` until a good reading arrives
    malformed: bool,
}

#[derive(Debug, Default)]
pub struct SnapshotMerger {
    latest: FxHashMap<GateId, GateRecord>,
}

impl SnapshotMerger {
    pub fn new() -> Self {
        Self { latest: FxHashMap::default() }
    }

    /// Merge one snapshot into the retained state and rebuild the
    /// ordered view. Output length is monotonically non-decreasing
    /// across calls and ranks are always dense.
    pub fn merge(
        &mut self,
        order: &mut OrderTracker,
        observations: &[RawObservation],
        thresholds: &ActivityThresholds,
    ) -> Vec<GateView> {
        order.reconcile(observations.iter().map(|o| &o.id));

        for obs in observations {
            match (obs.triggered_at_ms, obs.since_last_trigger_secs) {
                (Some(ts), Some(delta)) => {
                    self.latest.insert(
                        obs.id.clone(),
                        GateRecord {
                            triggered_at_ms: ts,
                            since_last_trigger_secs: delta,
                            malformed: false,
                        },
                    );
                }
                _ => {
                    warn!(gate = %obs.id, "gate_observation_malformed");
                    // Keep previous values if we have them, just flag the
                    // record; a brand-new gate gets zeroed metrics
                    self.latest
                        .entry(obs.id.clone())
                        .and_modify(|rec| rec.malformed = true)
                        .or_insert(GateRecord {
                            triggered_at_ms: 0,
                            since_last_trigger_secs: 0.0,
                            malformed: true,
                        });
                }
            }
        }

        self.build_view(order, thresholds)
    }

    /// Rebuild the view from retained state without new observations.
    /// Used after manual reorders, where only ranks and in-order deltas
    /// change.
    pub fn build_view(
        &self,
        order: &OrderTracker,
        thresholds: &ActivityThresholds,
    ) -> Vec<GateView> {
        let mut view = Vec::with_capacity(order.len());
        let mut prev_ts: Option<u64> = None;

        for id in order.order() {
            let Some(rec) = self.latest.get(id) else {
                continue;
            };

            let delta_from_previous_secs =
                prev_ts.map(|prev| (rec.triggered_at_ms as i64 - prev as i64) as f64 / 1000.0);
            prev_ts = Some(rec.triggered_at_ms);

            let activity = if rec.malformed {
                ActivityClass::Stale
            } else {
                thresholds.classify(rec.since_last_trigger_secs)
            };

            view.push(GateView {
                id: id.clone(),
                triggered_at_ms: rec.triggered_at_ms,
                since_last_trigger_secs: rec.since_last_trigger_secs,
                rank: view.len(),
                delta_from_previous_secs,
                activity,
            });
        }

        view
    }

    pub fn known_gates(&self) -> usize {
        self.latest.len()
    }
}
