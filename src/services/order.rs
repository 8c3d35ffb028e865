//! Insertion-stable gate ordering
//!
//! The tracker owns the canonical display order of every gate ever
//! observed. New gates are appended at the end on first sight; existing
//! entries never move unless the user explicitly reorders them. There is
//! no deletion: a gate that stops reporting stays in the order so its
//! timing history does not vanish from a dropped poll.

use crate::domain::types::GateId;
use tracing::{debug, warn};

#[derive(Debug, Default)]
pub struct OrderTracker {
    order: Vec<GateId>,
}

impl OrderTracker {
    pub fn new() -> Self {
        Self { order: Vec::new() }
    }

    /// Append any identifier not already tracked, in the order
    /// encountered. Idempotent: reconciling an already-known set is a
    /// no-op.
    pub fn reconcile<'a>(&mut self, observed: impl IntoIterator<Item = &'a GateId>) {
        for id in observed {
            if !self.order.contains(id) {
                debug!(gate = %id, rank = self.order.len(), "gate_first_seen");
                self.order.push(id.clone());
            }
        }
    }

    /// Relocate the entry at `from` to `to`, shifting intervening entries
    /// by one position (list-splice semantics, not a swap). Out-of-range
    /// ranks are a silent no-op; they must never corrupt the order.
    pub fn move_entry(&mut self, from: usize, to: usize) {
        if from >= self.order.len() || to >= self.order.len() {
            warn!(from, to, len = self.order.len(), "gate_move_out_of_range");
            return;
        }
        if from == to {
            return;
        }
        let id = self.order.remove(from);
        self.order.insert(to, id);
    }

    /// Current rank of an identifier, if tracked
    pub fn rank_of(&self, id: &GateId) -> Option<usize> {
        self.order.iter().position(|g| g == id)
    }

    pub fn order(&self) -> &[GateId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<GateId> {
        names.iter().map(|n| GateId::from(*n)).collect()
    }

    #[test]
    fn test_reconcile_appends_in_encounter_order() {
        let mut tracker = OrderTracker::new();
        tracker.reconcile(&ids(&["b", "a"]));
        assert_eq!(tracker.order(), ids(&["b", "a"]).as_slice());

        // New gate lands at the highest rank, existing ranks untouched
        tracker.reconcile(&ids(&["a", "c"]));
        assert_eq!(tracker.order(), ids(&["b", "a", "c"]).as_slice());
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let mut tracker = OrderTracker::new();
        tracker.reconcile(&ids(&["a", "b", "c"]));
        let before = tracker.order().to_vec();

        tracker.reconcile(&ids(&["a", "b", "c"]));
        assert_eq!(tracker.order(), before.as_slice());
    }

    #[test]
    fn test_omitted_gates_are_never_forgotten() {
        let mut tracker = OrderTracker::new();
        tracker.reconcile(&ids(&["a", "b"]));

        // Later snapshot omits "a" entirely
        tracker.reconcile(&ids(&["b"]));
        assert_eq!(tracker.order(), ids(&["a", "b"]).as_slice());
    }

    #[test]
    fn test_move_splice_semantics() {
        let mut tracker = OrderTracker::new();
        tracker.reconcile(&ids(&["a", "b", "c", "d"]));

        // Move "a" down two positions: entries in between shift up by one
        tracker.move_entry(0, 2);
        assert_eq!(tracker.order(), ids(&["b", "c", "a", "d"]).as_slice());

        // And back up
        tracker.move_entry(2, 0);
        assert_eq!(tracker.order(), ids(&["a", "b", "c", "d"]).as_slice());
    }

    #[test]
    fn test_move_out_of_range_is_noop() {
        let mut tracker = OrderTracker::new();
        tracker.reconcile(&ids(&["a", "b", "c"]));

        tracker.move_entry(5, 1);
        assert_eq!(tracker.order(), ids(&["a", "b", "c"]).as_slice());

        tracker.move_entry(1, 9);
        assert_eq!(tracker.order(), ids(&["a", "b", "c"]).as_slice());
    }

    #[test]
    fn test_rank_of() {
        let mut tracker = OrderTracker::new();
        tracker.reconcile(&ids(&["a", "b"]));
        assert_eq!(tracker.rank_of(&GateId::from("b")), Some(1));
        assert_eq!(tracker.rank_of(&GateId::from("zz")), None);
    }
}
