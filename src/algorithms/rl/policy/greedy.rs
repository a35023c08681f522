//! Greedy chase baseline.

use super::trait_::Policy;
use crate::algorithms::rl::types::StateKey;
use crate::grid::{Action, GridBounds};

/// Moves to the neighboring cell with the smallest Manhattan distance to
/// the target.
///
/// Ignores the target body and never plans ahead, so it serves as a
/// heuristic baseline the learned policy should beat on containment.
pub struct GreedyChasePolicy {
    bounds: GridBounds,
}

impl GreedyChasePolicy {
    pub fn new(bounds: GridBounds) -> Self {
        Self { bounds }
    }
}

impl Policy for GreedyChasePolicy {
    fn choose_action(&mut self, state: &StateKey) -> Action {
        let mut best = Action::ALL[0];
        let mut best_distance = i32::MAX;
        for action in Action::ALL {
            let next = self.bounds.apply(state.pursuer, action);
            let d = next.manhattan_distance(&state.target);
            if d < best_distance {
                best = action;
                best_distance = d;
            }
        }
        best
    }

    fn name(&self) -> &str {
        "greedy-chase"
    }
}
