//! Tabular epsilon-greedy Q-learning policy.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use super::trait_::Policy;
use crate::algorithms::rl::config::QLearningConfig;
use crate::algorithms::rl::q_table::QTable;
use crate::algorithms::rl::types::{StateKey, Transition};
use crate::grid::Action;

/// Epsilon-greedy policy over a [`QTable`], updated with one-step
/// Q-learning.
pub struct QPolicy {
    table: QTable,
    config: QLearningConfig,
    rng: StdRng,
}

impl QPolicy {
    /// Creates a policy with an empty table.
    pub fn new(config: QLearningConfig, seed: u64) -> Self {
        Self::with_table(config, QTable::new(), seed)
    }

    /// Creates a policy that continues from an existing table.
    pub fn with_table(config: QLearningConfig, table: QTable, seed: u64) -> Self {
        Self {
            table,
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &QLearningConfig {
        &self.config
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    pub fn into_table(self) -> QTable {
        self.table
    }

    /// Switches between exploration presets without touching the table.
    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.config.epsilon = epsilon;
    }

    /// One-step Q-learning update.
    ///
    /// `Q(s, a) <- (1 - alpha) Q(s, a) + alpha (reward + gamma max_a' Q(s', a'))`,
    /// seeding `Q(s, a)` first when absent. Returns the new value.
    pub fn update(
        &mut self,
        state: &StateKey,
        action: Action,
        reward: f64,
        next_state: &StateKey,
    ) -> f64 {
        let QLearningConfig {
            alpha,
            gamma,
            seed_scale,
            ..
        } = self.config;

        // Seed before taking the max so a self-loop sees its own seed.
        self.table
            .entry_or_seed(state, action, &mut self.rng, seed_scale);
        let target = reward + gamma * self.table.max_value(next_state);
        let entry = self
            .table
            .entry_or_seed(state, action, &mut self.rng, seed_scale);
        *entry = (1.0 - alpha) * *entry + alpha * target;
        trace!(%state, %action, reward, value = *entry, "q update");
        *entry
    }
}

impl Policy for QPolicy {
    fn choose_action(&mut self, state: &StateKey) -> Action {
        let explore = self.rng.gen::<f64>() < self.config.epsilon;
        if explore || !self.table.has_state(state) {
            return Action::ALL[self.rng.gen_range(0..Action::COUNT)];
        }
        self.table.best_action(state)
    }

    fn observe(&mut self, transition: &Transition) {
        self.update(
            &transition.state,
            transition.action,
            transition.reward,
            &transition.next_state,
        );
    }

    fn name(&self) -> &str {
        "q-learning"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::rl::types::QKey;
    use crate::grid::Position;

    fn greedy() -> QLearningConfig {
        QLearningConfig {
            epsilon: 0.0,
            ..QLearningConfig::default()
        }
    }

    fn state() -> StateKey {
        StateKey::new(Position::new(100, 100), Position::new(200, 200))
    }

    #[test]
    fn dominating_action_is_chosen_without_exploration() {
        let mut table = QTable::new();
        for action in Action::ALL {
            table.insert(QKey::new(state(), action), 0.5);
        }
        table.insert(QKey::new(state(), Action::UpLeft), 3.0);
        let mut policy = QPolicy::with_table(greedy(), table, 1);
        for _ in 0..50 {
            assert_eq!(policy.choose_action(&state()), Action::UpLeft);
        }
    }

    #[test]
    fn repeated_updates_converge_to_target() {
        let mut policy = QPolicy::new(greedy(), 2);
        let next = StateKey::new(Position::new(110, 110), Position::new(200, 200));
        policy.table.insert(QKey::new(next, Action::Right), 4.0);

        let expected = 1.0 + 0.9 * 4.0;
        let mut value = 0.0;
        for _ in 0..200 {
            value = policy.update(&state(), Action::Down, 1.0, &next);
        }
        assert!((value - expected).abs() < 1e-6);
    }

    #[test]
    fn first_update_blends_seed_and_target() {
        let mut policy = QPolicy::new(greedy(), 5);
        let next = StateKey::new(Position::new(110, 100), Position::new(200, 200));
        let value = policy.update(&state(), Action::Up, 10.0, &next);
        // seed in [0, 0.01): 0.9 * seed + 0.1 * (10 + 0.9 * 0)
        assert!(value >= 1.0 && value < 1.0 + 0.9 * 0.01);
    }

    #[test]
    fn self_loop_update_includes_fresh_seed_in_max() {
        let mut looped = QPolicy::new(greedy(), 11);
        let mut elsewhere = QPolicy::new(greedy(), 11);
        let other = StateKey::new(Position::new(500, 500), Position::new(0, 0));

        // Both draw the same seed; only the self-loop sees it as max Q(s').
        let loop_value = looped.update(&state(), Action::Up, 0.0, &state());
        let plain_value = elsewhere.update(&state(), Action::Up, 0.0, &other);
        assert!(plain_value > 0.0);
        // 0.9 * seed + 0.1 * 0.9 * seed versus 0.9 * seed
        assert!((loop_value / plain_value - 1.1).abs() < 1e-9);
    }

    #[test]
    fn observe_routes_to_update() {
        let mut policy = QPolicy::new(greedy(), 3);
        policy.observe(&Transition {
            state: state(),
            action: Action::Left,
            reward: -5.0,
            next_state: state(),
        });
        assert!(policy.table().get(&state(), Action::Left).unwrap() < 0.0);
        assert_eq!(policy.table().len(), 1);
    }

    #[test]
    fn unknown_state_explores() {
        let mut policy = QPolicy::new(greedy(), 9);
        let seen: std::collections::HashSet<Action> =
            (0..300).map(|_| policy.choose_action(&state())).collect();
        assert!(seen.len() > 1);
    }
}
