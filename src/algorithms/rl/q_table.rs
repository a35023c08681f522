//! Sparse action-value table.

use std::collections::HashMap;

use rand::Rng;

use super::types::{QKey, StateKey};
use crate::grid::Action;

/// Sparse `(state, action) -> value` map.
///
/// Entries are created lazily and never evicted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QTable {
    values: HashMap<QKey, f64>,
}

impl QTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Stored value, if the pair has been seen.
    pub fn get(&self, state: &StateKey, action: Action) -> Option<f64> {
        self.values.get(&QKey::new(*state, action)).copied()
    }

    /// Stored value, with unseen pairs valued 0.
    pub fn value(&self, state: &StateKey, action: Action) -> f64 {
        self.get(state, action).unwrap_or(0.0)
    }

    /// Returns true if any action has an entry for `state`.
    pub fn has_state(&self, state: &StateKey) -> bool {
        Action::ALL
            .iter()
            .any(|&a| self.values.contains_key(&QKey::new(*state, a)))
    }

    /// `max_a Q(state, a)`, with unseen pairs valued 0.
    pub fn max_value(&self, state: &StateKey) -> f64 {
        Action::ALL
            .iter()
            .map(|&a| self.value(state, a))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Greedy action for `state`. Ties keep the earliest action in
    /// [`Action::ALL`] order.
    pub fn best_action(&self, state: &StateKey) -> Action {
        let mut best = Action::ALL[0];
        let mut best_value = self.value(state, best);
        for &action in &Action::ALL[1..] {
            let v = self.value(state, action);
            if v > best_value {
                best = action;
                best_value = v;
            }
        }
        best
    }

    pub fn insert(&mut self, key: QKey, value: f64) {
        self.values.insert(key, value);
    }

    /// Mutable entry for `(state, action)`, seeded uniformly in
    /// `[0, seed_scale)` when absent.
    pub fn entry_or_seed<R: Rng + ?Sized>(
        &mut self,
        state: &StateKey,
        action: Action,
        rng: &mut R,
        seed_scale: f64,
    ) -> &mut f64 {
        self.values
            .entry(QKey::new(*state, action))
            .or_insert_with(|| rng.gen::<f64>() * seed_scale)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QKey, &f64)> {
        self.values.iter()
    }
}

impl FromIterator<(QKey, f64)> for QTable {
    fn from_iter<I: IntoIterator<Item = (QKey, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Position;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn state() -> StateKey {
        StateKey::new(Position::new(0, 0), Position::new(50, 50))
    }

    #[test]
    fn unseen_pairs_are_zero() {
        let table = QTable::new();
        assert!(!table.has_state(&state()));
        assert_eq!(table.value(&state(), Action::Up), 0.0);
        assert_eq!(table.max_value(&state()), 0.0);
    }

    #[test]
    fn best_action_prefers_highest_value() {
        let mut table = QTable::new();
        table.insert(QKey::new(state(), Action::DownRight), 2.0);
        table.insert(QKey::new(state(), Action::Left), 1.0);
        assert!(table.has_state(&state()));
        assert_eq!(table.best_action(&state()), Action::DownRight);
        assert_eq!(table.max_value(&state()), 2.0);
    }

    #[test]
    fn ties_keep_canonical_order() {
        let mut table = QTable::new();
        table.insert(QKey::new(state(), Action::Down), 1.0);
        table.insert(QKey::new(state(), Action::Left), 1.0);
        assert_eq!(table.best_action(&state()), Action::Left);
    }

    #[test]
    fn negative_values_lose_to_unseen_zero() {
        let mut table = QTable::new();
        table.insert(QKey::new(state(), Action::Right), -3.0);
        assert_eq!(table.best_action(&state()), Action::Left);
        assert_eq!(table.max_value(&state()), 0.0);
    }

    #[test]
    fn seeded_entries_are_small_and_stable() {
        let mut table = QTable::new();
        let mut rng = StdRng::seed_from_u64(3);
        let first = *table.entry_or_seed(&state(), Action::Up, &mut rng, 0.01);
        assert!((0.0..0.01).contains(&first));
        let again = *table.entry_or_seed(&state(), Action::Up, &mut rng, 0.01);
        assert_eq!(first, again);
        assert_eq!(table.len(), 1);
    }
}
