//! Sequence timing analysis over a gate selection
//!
//! Pure functions of (selection, view): no hidden state, recomputed in
//! full whenever either input changes. Deltas are computed from the raw
//! trigger timestamps, not from the per-gate time-since-last values.

use crate::domain::types::{GateId, GateView, SequenceDelta, SequenceStats};

/// Pairwise timing deltas for each consecutive pair of the selection, in
/// selection order. Selected identifiers missing from the view are
/// dropped before pairing; fewer than two resolvable entries yields an
/// empty list.
pub fn sequence_deltas(selection: &[GateId], view: &[GateView]) -> Vec<SequenceDelta> {
    let resolved: Vec<(&GateId, u64)> = selection
        .iter()
        .filter_map(|id| {
            view.iter().find(|g| &g.id == id).map(|g| (id, g.triggered_at_ms))
        })
        .collect();

    if resolved.len() < 2 {
        return Vec::new();
    }

    resolved
        .windows(2)
        .map(|pair| {
            let (from, from_ts) = pair[0];
            let (to, to_ts) = pair[1];
            SequenceDelta {
                from: from.clone(),
                to: to.clone(),
                // Sign preserved: negative means `to` fired first
                delta_secs: (to_ts as i64 - from_ts as i64) as f64 / 1000.0,
            }
        })
        .collect()
}

/// Aggregate statistics over a delta list, or `None` when it is empty.
///
/// `total_secs` is the signed sum, i.e. the net elapsed time from the
/// first to the last selected trigger. The fastest and average splits
/// use magnitudes.
pub fn sequence_stats(deltas: &[SequenceDelta]) -> Option<SequenceStats> {
    if deltas.is_empty() {
        return None;
    }

    let total_secs = deltas.iter().map(|d| d.delta_secs).sum();
    let fastest_abs_secs =
        deltas.iter().map(|d| d.delta_secs.abs()).fold(f64::INFINITY, f64::min);
    let average_abs_secs =
        deltas.iter().map(|d| d.delta_secs.abs()).sum::<f64>() / deltas.len() as f64;

    Some(SequenceStats { total_secs, fastest_abs_secs, average_abs_secs })
}
