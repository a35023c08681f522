//! Policy trait for the pursuit environment.

use crate::algorithms::rl::types::{StateKey, Transition};
use crate::grid::Action;

/// A policy that picks the pursuer's next move from the discretized state.
pub trait Policy: Send + Sync {
    /// Selects one action for the given state.
    fn choose_action(&mut self, state: &StateKey) -> Action;

    /// Feeds back the outcome of the last action.
    ///
    /// Learning policies update their estimates here; fixed baselines ignore it.
    fn observe(&mut self, _transition: &Transition) {}

    /// Returns a human-readable name for this policy.
    fn name(&self) -> &str;
}
