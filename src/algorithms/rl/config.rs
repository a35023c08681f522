//! Configuration for Q-learning, reward shaping and training.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Exploration rate used during live play.
pub const LIVE_EPSILON: f64 = 0.05;
/// Exploration rate used during offline training.
pub const TRAINING_EPSILON: f64 = 0.2;

/// Q-learning hyperparameters.
///
/// Fixed for the duration of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QLearningConfig {
    /// Probability of taking a uniformly random action.
    pub epsilon: f64,
    /// Learning rate α.
    pub alpha: f64,
    /// Discount factor γ.
    pub gamma: f64,
    /// New table entries are seeded uniformly in `[0, seed_scale)`.
    pub seed_scale: f64,
}

impl QLearningConfig {
    /// Preset for offline training (ε = 0.2).
    pub fn training() -> Self {
        Self {
            epsilon: TRAINING_EPSILON,
            ..Self::default()
        }
    }

    /// Preset for live play (ε = 0.05).
    pub fn live() -> Self {
        Self {
            epsilon: LIVE_EPSILON,
            ..Self::default()
        }
    }

    /// Checks that every rate lies in its valid range.
    ///
    /// `epsilon` may be 0 (pure exploitation); `alpha` and `gamma` must lie
    /// strictly inside `(0, 1)`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("epsilon", self.epsilon, 0.0..1.0)?;
        check_open_unit("alpha", self.alpha)?;
        check_open_unit("gamma", self.gamma)?;
        check_range("seed_scale", self.seed_scale, 0.0..1.0)
    }
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            epsilon: TRAINING_EPSILON,
            alpha: 0.1,
            gamma: 0.9,
            seed_scale: 0.01,
        }
    }
}

/// Reward shaping weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    // --- Distance term ---
    /// Weight of the distance to the target's current position.
    pub current_weight: f64,
    /// Weight of the distance to the predicted position.
    pub predicted_weight: f64,
    /// Multiplier on the composite distance change.
    pub distance_scale: f64,

    // --- Containment term ---
    /// Escape paths at or below which no penalty applies.
    pub free_escape_paths: u32,
    /// Penalty per escape path above the threshold.
    pub escape_penalty: f64,
    /// Bonus per escape path below the threshold.
    pub trap_bonus: f64,

    // --- Proximity term ---
    /// Penalty per occupied cell one step away.
    pub adjacent_penalty: f64,
    /// Penalty per occupied cell two steps away.
    pub nearby_penalty: f64,
    /// Occupied-cell count at which the crowding penalty applies.
    pub crowding_threshold: u32,
    pub crowding_penalty: f64,
    /// Minimum distance under which the closeness penalty applies.
    pub close_distance: f64,
    /// Closeness penalty is `(close_base - min_distance) * close_gain`.
    pub close_base: f64,
    pub close_gain: f64,
    /// Damping applied when subtracting the proximity penalty.
    pub proximity_weight: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            current_weight: 0.6,
            predicted_weight: 0.4,
            distance_scale: 3.0,
            free_escape_paths: 3,
            escape_penalty: 7.0,
            trap_bonus: 12.0,
            adjacent_penalty: 5.0,
            nearby_penalty: 3.0,
            crowding_threshold: 5,
            crowding_penalty: 25.0,
            close_distance: 20.0,
            close_base: 30.0,
            close_gain: 1.5,
            proximity_weight: 0.3,
        }
    }
}

impl RewardConfig {
    /// Trap bonus must outweigh the escape penalty so trapping beats chasing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trap_bonus <= self.escape_penalty {
            return Err(ConfigError::TrapBonusTooSmall {
                bonus: self.trap_bonus,
                penalty: self.escape_penalty,
            });
        }
        check_range("proximity_weight", self.proximity_weight, 0.0..1.0)
    }
}

/// Episode structure for offline training.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Number of episodes to run.
    pub episodes: u32,
    /// Tick cap per episode.
    pub max_steps: u32,
    /// A step reward below this ends the episode.
    pub abort_reward: f64,
    /// Number of recent target cells forming its body.
    pub trail_length: usize,
    /// Base RNG seed; each episode advances it.
    pub seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 100,
            max_steps: 300,
            abort_reward: -100.0,
            trail_length: 10,
            seed: 42,
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_steps == 0 {
            return Err(ConfigError::ZeroSteps);
        }
        Ok(())
    }
}

fn check_range(name: &'static str, value: f64, range: std::ops::Range<f64>) -> Result<(), ConfigError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            range: format!("[{}, {})", range.start, range.end),
        })
    }
}

fn check_open_unit(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            range: "(0, 1)".to_string(),
        })
    }
}
