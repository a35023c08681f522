//! Top-level configuration.
//!
//! Every component has its own config struct with sensible defaults;
//! [`PursuitConfig`] aggregates them and can be loaded from a JSON file in
//! which any omitted field keeps its default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::algorithms::pathfinding::PathfinderConfig;
use crate::algorithms::prediction::PredictorConfig;
use crate::algorithms::rl::config::{QLearningConfig, RewardConfig, TrainingConfig};
use crate::algorithms::steering::{BoidParams, TargetDriverConfig};
use crate::grid::{GridBounds, GRID_STEP};

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be in {range}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        range: String,
    },

    #[error("Grid size must exceed the grid step, got {0}")]
    GridTooSmall(i32),

    #[error("History size must be at least 2, got {0}")]
    HistoryTooShort(usize),

    #[error("Trap bonus ({bonus}) must exceed escape penalty ({penalty})")]
    TrapBonusTooSmall { bonus: f64, penalty: f64 },

    #[error("Episodes need at least one step")]
    ZeroSteps,

    #[error("Boid speed range is empty: min {min}, max {max}")]
    EmptySpeedRange { min: f64, max: f64 },

    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Complete configuration for the pursuit stack.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PursuitConfig {
    pub grid: GridBounds,
    pub predictor: PredictorConfig,
    pub pathfinder: PathfinderConfig,
    pub q_learning: QLearningConfig,
    pub reward: RewardConfig,
    pub boids: BoidParams,
    pub target: TargetDriverConfig,
    pub training: TrainingConfig,
}

impl PursuitConfig {
    /// Parses a configuration from JSON and validates it.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a configuration file and validates it.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Checks cross-field and range constraints of every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.size <= GRID_STEP {
            return Err(ConfigError::GridTooSmall(self.grid.size));
        }
        if self.predictor.history_size < 2 {
            return Err(ConfigError::HistoryTooShort(self.predictor.history_size));
        }
        if self.boids.min_speed > self.boids.max_speed {
            return Err(ConfigError::EmptySpeedRange {
                min: self.boids.min_speed,
                max: self.boids.max_speed,
            });
        }
        self.q_learning.validate()?;
        self.reward.validate()?;
        self.training.validate()
    }
}
