//! User gate selection
//!
//! An ordered, duplicate-free list of gate identifiers. Selection order
//! is the order the user added each gate, independent of display rank.
//! A selected gate that later disappears from the view is tolerated; the
//! analyzer simply skips it.

use crate::domain::types::GateId;

#[derive(Debug, Default)]
pub struct SelectionStore {
    selected: Vec<GateId>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self { selected: Vec::new() }
    }

    /// Add `id` at the end if absent, otherwise remove it. Removal keeps
    /// the relative order of the remaining members.
    pub fn toggle(&mut self, id: &GateId) {
        if let Some(pos) = self.selected.iter().position(|g| g == id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(id.clone());
        }
    }

    /// Select every gate in the given rank order
    pub fn set_all(&mut self, order: &[GateId]) {
        self.selected = order.to_vec();
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Select the first `n` gates of the given rank order (fewer if the
    /// order is shorter)
    pub fn select_first_n(&mut self, order: &[GateId], n: usize) {
        let n = n.min(order.len());
        self.selected = order[..n].to_vec();
    }

    /// Select the last `n` gates of the given rank order, preserving
    /// rank order within the selection
    pub fn select_last_n(&mut self, order: &[GateId], n: usize) {
        let start = order.len().saturating_sub(n);
        self.selected = order[start..].to_vec();
    }

    pub fn is_selected(&self, id: &GateId) -> bool {
        self.selected.iter().any(|g| g == id)
    }

    pub fn selected(&self) -> &[GateId] {
        &self.selected
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<GateId> {
        names.iter().map(|n| GateId::from(*n)).collect()
    }

    #[test]
    fn test_toggle_appends_and_removes() {
        let mut sel = SelectionStore::new();
        sel.toggle(&GateId::from("c"));
        sel.toggle(&GateId::from("a"));
        assert_eq!(sel.selected(), ids(&["c", "a"]).as_slice());

        // Toggling again removes without disturbing the rest
        sel.toggle(&GateId::from("c"));
        assert_eq!(sel.selected(), ids(&["a"]).as_slice());
    }

    #[test]
    fn test_selection_order_is_user_order_not_rank() {
        let mut sel = SelectionStore::new();
        sel.toggle(&GateId::from("z"));
        sel.toggle(&GateId::from("b"));
        sel.toggle(&GateId::from("m"));
        assert_eq!(sel.selected(), ids(&["z", "b", "m"]).as_slice());
    }

    #[test]
    fn test_removal_preserves_relative_order() {
        let mut sel = SelectionStore::new();
        for name in ["a", "b", "c", "d"] {
            sel.toggle(&GateId::from(name));
        }
        sel.toggle(&GateId::from("b"));
        assert_eq!(sel.selected(), ids(&["a", "c", "d"]).as_slice());
    }

    #[test]
    fn test_bulk_operations() {
        let order = ids(&["a", "b", "c", "d"]);
        let mut sel = SelectionStore::new();

        sel.set_all(&order);
        assert_eq!(sel.selected(), order.as_slice());

        sel.select_first_n(&order, 2);
        assert_eq!(sel.selected(), ids(&["a", "b"]).as_slice());

        sel.select_last_n(&order, 2);
        assert_eq!(sel.selected(), ids(&["c", "d"]).as_slice());

        sel.clear();
        assert!(sel.is_empty());
    }

    #[test]
    fn test_bulk_operations_clamp_to_order_length() {
        let order = ids(&["a", "b"]);
        let mut sel = SelectionStore::new();

        sel.select_first_n(&order, 10);
        assert_eq!(sel.selected(), order.as_slice());

        sel.select_last_n(&order, 10);
        assert_eq!(sel.selected(), order.as_slice());
    }
}
