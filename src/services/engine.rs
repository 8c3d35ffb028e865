//! Gate reconciliation engine
//!
//! Owns all engine state (order, latest observations, selection) and
//! exposes the full operation set: snapshot application, manual reorder,
//! selection editing. The ordered view and sequence deltas are derived
//! values, recomputed in full after every mutation so they can never
//! silently diverge from their inputs.
//!
//! Snapshot application is gated on a monotonic sequence stamp: a fetch
//! that completes after a newer one has already been merged is discarded
//! rather than overwriting newer state with stale data.

use crate::domain::types::{
    ActivityThresholds, GateId, GateView, RawObservation, SequenceDelta, SequenceStats,
};
use crate::services::analyzer;
use crate::services::merger::SnapshotMerger;
use crate::services::order::OrderTracker;
use crate::services::selection::SelectionStore;
use tracing::{debug, warn};

pub struct GateEngine {
    thresholds: ActivityThresholds,
    order: OrderTracker,
    merger: SnapshotMerger,
    selection: SelectionStore,
    /// Derived: ordered annotated view, rebuilt on every mutation
    view: Vec<GateView>,
    /// Derived: pairwise deltas over the selection, rebuilt with the view
    deltas: Vec<SequenceDelta>,
    /// Sequence stamp of the newest applied snapshot (0 = none yet)
    last_applied_seq: u64,
    connected: bool,
}

impl GateEngine {
    pub fn new(thresholds: ActivityThresholds) -> Self {
        Self {
            thresholds,
            order: OrderTracker::new(),
            merger: SnapshotMerger::new(),
            selection: SelectionStore::new(),
            view: Vec::new(),
            deltas: Vec::new(),
            last_applied_seq: 0,
            connected: false,
        }
    }

    /// Merge one polled snapshot, stamped with its issue sequence.
    /// Returns false (state untouched) when a newer snapshot has already
    /// been applied.
    pub fn apply_snapshot(&mut self, seq: u64, observations: &[RawObservation]) -> bool {
        if seq <= self.last_applied_seq {
            warn!(
                seq,
                last_applied = self.last_applied_seq,
                "stale_snapshot_discarded"
            );
            return false;
        }

        self.view = self.merger.merge(&mut self.order, observations, &self.thresholds);
        self.last_applied_seq = seq;
        self.connected = true;
        self.recompute_deltas();

        debug!(seq, gates = self.view.len(), "snapshot_applied");
        true
    }

    /// Transport failure for one cycle: engine state stays untouched,
    /// only the connectivity flag drops
    pub fn mark_disconnected(&mut self) {
        self.connected = false;
    }

    /// Relocate a gate between display ranks (splice semantics;
    /// out-of-range is a no-op). In-order deltas follow the new order.
    pub fn move_gate(&mut self, from_rank: usize, to_rank: usize) {
        self.order.move_entry(from_rank, to_rank);
        self.view = self.merger.build_view(&self.order, &self.thresholds);
        self.recompute_deltas();
    }

    pub fn toggle(&mut self, id: &GateId) {
        self.selection.toggle(id);
        self.recompute_deltas();
    }

    pub fn select_all(&mut self) {
        self.selection.set_all(self.order.order());
        self.recompute_deltas();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.recompute_deltas();
    }

    pub fn select_first_n(&mut self, n: usize) {
        self.selection.select_first_n(self.order.order(), n);
        self.recompute_deltas();
    }

    pub fn select_last_n(&mut self, n: usize) {
        self.selection.select_last_n(self.order.order(), n);
        self.recompute_deltas();
    }

    fn recompute_deltas(&mut self) {
        self.deltas = analyzer::sequence_deltas(self.selection.selected(), &self.view);
    }

    pub fn view(&self) -> &[GateView] {
        &self.view
    }

    pub fn selection(&self) -> &[GateId] {
        self.selection.selected()
    }

    pub fn is_selected(&self, id: &GateId) -> bool {
        self.selection.is_selected(id)
    }

    pub fn deltas(&self) -> &[SequenceDelta] {
        &self.deltas
    }

    /// Aggregate stats derived from the current delta list, `None` when
    /// fewer than two selected gates resolve
    pub fn stats(&self) -> Option<SequenceStats> {
        analyzer::sequence_stats(&self.deltas)
    }

    pub fn connected(&self) -> bool {
        self.connected
    }

    pub fn gate_count(&self) -> usize {
        self.view.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(id: &str, ts: u64, delta: f64) -> RawObservation {
        RawObservation {
            id: GateId::from(id),
            triggered_at_ms: Some(ts),
            since_last_trigger_secs: Some(delta),
        }
    }

    fn engine_with_abc() -> GateEngine {
        let mut engine = GateEngine::new(ActivityThresholds::default());
        engine.apply_snapshot(
            1,
            &[obs("a", 1000, 0.1), obs("b", 1500, 0.2), obs("c", 4500, 0.3)],
        );
        engine
    }

    #[test]
    fn test_stale_snapshot_is_discarded() {
        let mut engine = GateEngine::new(ActivityThresholds::default());
        engine.apply_snapshot(2, &[obs("a", 5000, 0.1)]);

        // A slower fetch issued earlier completes late
        engine.apply_snapshot(1, &[obs("a", 1000, 9.0)]);
        assert_eq!(engine.view()[0].triggered_at_ms, 5000);

        engine.apply_snapshot(3, &[obs("a", 6000, 0.1)]);
        assert_eq!(engine.view()[0].triggered_at_ms, 6000);
    }

    #[test]
    fn test_rank_stability_across_snapshots() {
        let mut engine = engine_with_abc();

        // Later snapshot arrives in a different order and adds a gate
        engine.apply_snapshot(2, &[obs("c", 9000, 0.1), obs("d", 9500, 0.1), obs("a", 8000, 0.1)]);

        let ranks: Vec<(String, usize)> =
            engine.view().iter().map(|g| (g.id.0.clone(), g.rank)).collect();
        assert_eq!(
            ranks,
            vec![
                ("a".to_string(), 0),
                ("b".to_string(), 1),
                ("c".to_string(), 2),
                ("d".to_string(), 3)
            ]
        );
    }

    #[test]
    fn test_move_recomputes_in_order_deltas() {
        let mut engine = engine_with_abc();
        assert_eq!(engine.view()[1].delta_from_previous_secs, Some(0.5));

        engine.move_gate(2, 0); // order: c, a, b
        assert_eq!(engine.view()[0].id, GateId::from("c"));
        assert_eq!(engine.view()[1].delta_from_previous_secs, Some(-3.5));
    }

    #[test]
    fn test_selection_survives_new_snapshots() {
        let mut engine = engine_with_abc();
        engine.toggle(&GateId::from("c"));
        engine.toggle(&GateId::from("a"));
        assert_eq!(engine.deltas().len(), 1);
        assert_eq!(engine.deltas()[0].delta_secs, -3.5);

        // New poll updates timestamps; deltas recompute automatically
        engine.apply_snapshot(2, &[obs("a", 10_000, 0.1), obs("c", 9000, 0.1)]);
        assert_eq!(engine.deltas()[0].delta_secs, 1.0);
    }

    #[test]
    fn test_toggle_unknown_gate_is_tolerated() {
        let mut engine = engine_with_abc();
        engine.toggle(&GateId::from("ghost"));
        engine.toggle(&GateId::from("a"));

        // Ghost stays selected but resolves to nothing
        assert_eq!(engine.selection().len(), 2);
        assert!(engine.deltas().is_empty());
        assert_eq!(engine.stats(), None);
    }

    #[test]
    fn test_bulk_selection_uses_rank_order_at_call_time() {
        let mut engine = engine_with_abc();
        engine.move_gate(0, 2); // order: b, c, a
        engine.select_first_n(2);
        assert_eq!(
            engine.selection(),
            &[GateId::from("b"), GateId::from("c")]
        );

        engine.select_last_n(2);
        assert_eq!(
            engine.selection(),
            &[GateId::from("c"), GateId::from("a")]
        );
    }

    #[test]
    fn test_disconnect_leaves_state_untouched() {
        let mut engine = engine_with_abc();
        assert!(engine.connected());

        engine.mark_disconnected();
        assert!(!engine.connected());
        assert_eq!(engine.gate_count(), 3);

        engine.apply_snapshot(2, &[obs("a", 2000, 0.1)]);
        assert!(engine.connected());
    }

    #[test]
    fn test_stats_total_is_signed_sum() {
        let mut engine = engine_with_abc();
        engine.select_all();

        let stats = engine.stats().unwrap();
        assert_eq!(stats.total_secs, 3.5);
        assert_eq!(stats.fastest_abs_secs, 0.5);
        assert!((stats.average_abs_secs - 1.75).abs() < f64::EPSILON);
    }
}
