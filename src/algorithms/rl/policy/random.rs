//! Random policy for testing and baselines.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::trait_::Policy;
use crate::algorithms::rl::types::StateKey;
use crate::grid::Action;

/// Uniformly random action selection.
///
/// Used for sanity checks and as a lower-bound baseline.
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn choose_action(&mut self, _state: &StateKey) -> Action {
        Action::ALL[self.rng.gen_range(0..Action::COUNT)]
    }

    fn name(&self) -> &str {
        "random"
    }
}
