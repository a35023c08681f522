//! Offline pursuit environment.
//!
//! Each step follows the training loop: record target → rebuild obstacles →
//! predict → count escape paths → move pursuer → score → step target.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, warn};

use super::config::TrainingConfig;
use super::reward::{RewardBreakdown, RewardComputer};
use super::types::{StateKey, Transition};
use crate::algorithms::prediction::TrajectoryPredictor;
use crate::algorithms::steering::TargetDriver;
use crate::config::PursuitConfig;
use crate::grid::{Action, GridBounds, ObstacleSet, Position, PositionHistory};

/// Random target placements tried before falling back to a neighbor cell.
const PLACEMENT_ATTEMPTS: usize = 64;

/// Complete simulation state for one episode.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    pub pursuer: Position,
    pub target: Position,
    /// Recent target positions, newest last.
    pub history: PositionHistory,
    /// Cells the target recently left, newest last. Forms its body.
    pub trail: VecDeque<Position>,
}

impl SimulationState {
    pub fn new(pursuer: Position, target: Position, history_size: usize) -> Self {
        Self {
            pursuer,
            target,
            history: PositionHistory::new(history_size),
            trail: VecDeque::new(),
        }
    }

    pub fn key(&self) -> StateKey {
        StateKey::new(self.pursuer, self.target)
    }
}

/// Why an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The tick cap was reached.
    StepCap,
    /// A step reward fell below the abort threshold.
    RewardThreshold,
    /// The pursuer landed on the target's cell.
    Captured,
}

/// Result of a single environment step.
#[derive(Debug, Clone)]
pub struct StepResult {
    /// Experience to feed back to the policy.
    pub transition: Transition,
    pub reward: RewardBreakdown,
    /// Predicted target position used for shaping.
    pub predicted: Position,
    pub escape_paths: u32,
    /// Set when the episode is over.
    pub termination: Option<Termination>,
    /// Steps taken so far this episode.
    pub time_step: u32,
    pub cumulative_reward: f64,
}

impl StepResult {
    pub fn done(&self) -> bool {
        self.termination.is_some()
    }
}

/// The single-pursuer training environment.
///
/// # Lifecycle
///
/// 1. Call [`PursuitEnvironment::new`] with configuration and seed.
/// 2. Call [`PursuitEnvironment::reset`] to start an episode.
/// 3. Repeatedly call [`PursuitEnvironment::step`] until the result is done.
#[derive(Debug)]
pub struct PursuitEnvironment {
    bounds: GridBounds,
    training: TrainingConfig,
    predictor: TrajectoryPredictor,
    reward: RewardComputer,
    driver: TargetDriver,
    obstacles: ObstacleSet,
    /// Current episode state.
    pub state: SimulationState,
    /// Steps taken this episode.
    pub t: u32,
    /// Cumulative reward this episode.
    pub cumulative_reward: f64,
    rng: StdRng,
    /// Seed for the next reset.
    seed: u64,
}

impl PursuitEnvironment {
    pub fn new(config: &PursuitConfig, seed: u64) -> Self {
        let bounds = config.grid;
        Self {
            bounds,
            training: config.training,
            predictor: TrajectoryPredictor::new(config.predictor, bounds),
            reward: RewardComputer::new(config.reward, bounds),
            driver: TargetDriver::new(config.target),
            obstacles: ObstacleSet::new(),
            state: SimulationState::new(
                Position::origin(),
                Position::origin(),
                config.predictor.history_size,
            ),
            t: 0,
            cumulative_reward: 0.0,
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn bounds(&self) -> &GridBounds {
        &self.bounds
    }

    pub fn training_config(&self) -> &TrainingConfig {
        &self.training
    }

    pub fn reward_computer(&self) -> &RewardComputer {
        &self.reward
    }

    /// Body cells as of the last step.
    pub fn obstacles(&self) -> &ObstacleSet {
        &self.obstacles
    }

    /// Starts a new episode from random, distinct lattice cells.
    ///
    /// Each reset reseeds from the next seed, so episodes are reproducible
    /// individually. On a single-cell grid both agents share the cell and
    /// the first step captures.
    pub fn reset(&mut self) -> StateKey {
        self.rng = StdRng::seed_from_u64(self.seed);
        self.seed += 1;

        let pursuer = self.bounds.random_cell(&mut self.rng);
        let target = self.place_target(pursuer);
        self.reset_to(pursuer, target)
    }

    fn place_target(&mut self, pursuer: Position) -> Position {
        for _ in 0..PLACEMENT_ATTEMPTS {
            let target = self.bounds.random_cell(&mut self.rng);
            if target != pursuer {
                return target;
            }
        }
        let neighbor = Action::ALL
            .iter()
            .map(|&action| self.bounds.apply(pursuer, action))
            .find(|&cell| cell != pursuer);
        neighbor.unwrap_or_else(|| {
            warn!(size = self.bounds.size, "grid has a single cell, agents overlap");
            pursuer
        })
    }

    /// Starts a new episode from the given positions, snapped onto the grid.
    pub fn reset_to(&mut self, pursuer: Position, target: Position) -> StateKey {
        self.state.pursuer = self.bounds.snap_position(pursuer);
        self.state.target = self.bounds.snap_position(target);
        self.state.history.clear();
        self.state.trail.clear();
        self.obstacles = ObstacleSet::new();
        self.driver.reset();
        self.t = 0;
        self.cumulative_reward = 0.0;
        debug!(pursuer = %self.state.pursuer, target = %self.state.target, "episode reset");
        self.state.key()
    }

    /// Executes one environment step with the pursuer taking `action`.
    ///
    /// The transition's `next_state` pairs the pursuer's new cell with the
    /// target's cell before it moves.
    pub fn step(&mut self, action: Action) -> StepResult {
        let old = self.state.pursuer;
        let target = self.state.target;

        self.state.history.push(target);
        self.obstacles.rebuild(&self.state.trail);

        let predicted = self.predictor.predict_short(&self.state.history, target);
        let escape_paths = self.reward.count_escape_paths(target, old, &self.obstacles);

        let new = self.bounds.apply(old, action);
        let reward = self
            .reward
            .breakdown(old, new, target, predicted, escape_paths, &self.obstacles);

        let transition = Transition {
            state: StateKey::new(old, target),
            action,
            reward: reward.total,
            next_state: StateKey::new(new, target),
        };
        self.state.pursuer = new;

        let captured = new == target;
        if !captured {
            self.advance_target();
        }

        self.t += 1;
        self.cumulative_reward += reward.total;

        let termination = if captured {
            Some(Termination::Captured)
        } else if reward.total < self.training.abort_reward {
            Some(Termination::RewardThreshold)
        } else if self.t >= self.training.max_steps {
            Some(Termination::StepCap)
        } else {
            None
        };

        StepResult {
            transition,
            reward,
            predicted,
            escape_paths,
            termination,
            time_step: self.t,
            cumulative_reward: self.cumulative_reward,
        }
    }

    fn advance_target(&mut self) {
        let from = self.state.target;
        let to = self.driver.step(
            from,
            &self.state.history,
            self.state.pursuer,
            &self.bounds,
            &mut self.rng,
        );
        if to != from {
            self.state.trail.push_back(from);
            while self.state.trail.len() > self.training.trail_length {
                self.state.trail.pop_front();
            }
        }
        self.state.target = to;
    }
}
