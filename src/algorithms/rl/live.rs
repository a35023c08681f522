//! Play-mode pursuer.
//!
//! Driven once per game tick with the target's current segment list (head
//! first). Pathfinding strategies step one waypoint along an A* route; the
//! learned strategy acts on the Q-table and keeps learning online.

use tracing::{debug, trace};

use super::config::{QLearningConfig, LIVE_EPSILON};
use super::policy::{Policy, QPolicy};
use super::q_table::QTable;
use super::reward::RewardComputer;
use super::types::StateKey;
use crate::algorithms::pathfinding::Pathfinder;
use crate::algorithms::prediction::TrajectoryPredictor;
use crate::config::PursuitConfig;
use crate::grid::{Action, GridBounds, ObstacleSet, Position, PositionHistory};
use crate::persistence::{save_best_effort, TableStore};

/// How the live pursuer picks its next cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LiveStrategy {
    /// A* toward the target's head.
    #[default]
    Chase,
    /// A* toward the target's predicted position (long lookahead).
    Anticipate,
    /// Epsilon-greedy Q-policy with online updates.
    Learned,
}

/// What happened on one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    /// Pursuer position after the tick.
    pub position: Position,
    /// Whether the pursuer changed cell.
    pub moved: bool,
    /// Cell the pursuer was heading for, if any.
    pub goal: Option<Position>,
    /// Waypoints in the planned path (pathfinding strategies only).
    pub path_length: usize,
    /// Action taken and its reward (learned strategy only).
    pub action: Option<Action>,
    pub reward: Option<f64>,
}

impl TickOutcome {
    fn hold(position: Position) -> Self {
        Self {
            position,
            moved: false,
            goal: None,
            path_length: 0,
            action: None,
            reward: None,
        }
    }
}

/// The AI-controlled pursuer during play.
pub struct LivePursuer {
    strategy: LiveStrategy,
    bounds: GridBounds,
    predictor: TrajectoryPredictor,
    pathfinder: Pathfinder,
    reward: RewardComputer,
    policy: QPolicy,
    store: Option<Box<dyn TableStore>>,
    position: Position,
    history: PositionHistory,
    obstacles: ObstacleSet,
    seed: u64,
}

impl LivePursuer {
    /// Creates a pursuer at `start` (snapped onto the grid) with an empty
    /// table and the live exploration rate.
    pub fn new(config: &PursuitConfig, strategy: LiveStrategy, start: Position, seed: u64) -> Self {
        let bounds = config.grid;
        let q_config = QLearningConfig {
            epsilon: LIVE_EPSILON,
            ..config.q_learning
        };
        Self {
            strategy,
            bounds,
            predictor: TrajectoryPredictor::new(config.predictor, bounds),
            pathfinder: Pathfinder::with_config(bounds, config.pathfinder),
            reward: RewardComputer::new(config.reward, bounds),
            policy: QPolicy::new(q_config, seed),
            store: None,
            position: bounds.snap_position(start),
            history: PositionHistory::new(config.predictor.history_size),
            obstacles: ObstacleSet::new(),
            seed,
        }
    }

    /// Continues from a previously trained table.
    pub fn with_table(mut self, table: QTable) -> Self {
        let config = *self.policy.config();
        self.policy = QPolicy::with_table(config, table, self.seed);
        self
    }

    /// Attaches a store the table is written to after every online update.
    pub fn with_store(mut self, store: Box<dyn TableStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Teleports the pursuer, e.g. when it respawns.
    pub fn set_position(&mut self, position: Position) {
        self.position = self.bounds.snap_position(position);
    }

    pub fn strategy(&self) -> LiveStrategy {
        self.strategy
    }

    pub fn set_strategy(&mut self, strategy: LiveStrategy) {
        self.strategy = strategy;
    }

    pub fn policy(&self) -> &QPolicy {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut QPolicy {
        &mut self.policy
    }

    pub fn history(&self) -> &PositionHistory {
        &self.history
    }

    /// Advances the pursuer by one tick.
    ///
    /// `segments` is the target's body, head first. An empty list holds
    /// position.
    pub fn tick(&mut self, segments: &[Position]) -> TickOutcome {
        let Some(&raw_head) = segments.first() else {
            debug!("no target segments, holding");
            return TickOutcome::hold(self.position);
        };
        let head = self.bounds.snap_position(raw_head);
        self.history.push(head);
        let body: Vec<Position> = segments[1..]
            .iter()
            .map(|&p| self.bounds.snap_position(p))
            .collect();
        self.obstacles.rebuild(&body);

        match self.strategy {
            LiveStrategy::Chase => self.follow_path(head),
            LiveStrategy::Anticipate => {
                let goal = self.predictor.predict_long(&self.history, head);
                self.follow_path(goal)
            }
            LiveStrategy::Learned => self.learned_step(head),
        }
    }

    fn follow_path(&mut self, goal: Position) -> TickOutcome {
        let path = self
            .pathfinder
            .find_path_around(self.position, goal, &self.obstacles);
        let Some(&next) = path.get(1) else {
            debug!(from = %self.position, %goal, length = path.len(), "no usable path, holding");
            return TickOutcome {
                goal: Some(goal),
                path_length: path.len(),
                ..TickOutcome::hold(self.position)
            };
        };
        trace!(from = %self.position, to = %next, %goal, "pursuer step");
        self.position = next;
        TickOutcome {
            position: next,
            moved: true,
            goal: Some(goal),
            path_length: path.len(),
            action: None,
            reward: None,
        }
    }

    fn learned_step(&mut self, head: Position) -> TickOutcome {
        let old = self.position;
        let predicted = self.predictor.predict_short(&self.history, head);
        let escape_paths = self.reward.count_escape_paths(head, old, &self.obstacles);

        let state = StateKey::new(old, head);
        let action = self.policy.choose_action(&state);
        let new = self.bounds.apply(old, action);
        let reward = self
            .reward
            .score(old, new, head, predicted, escape_paths, &self.obstacles);
        self.policy
            .update(&state, action, reward, &StateKey::new(new, head));

        if let Some(store) = self.store.as_deref_mut() {
            save_best_effort(store, self.policy.table());
        }

        self.position = new;
        TickOutcome {
            position: new,
            moved: new != old,
            goal: Some(predicted),
            path_length: 0,
            action: Some(action),
            reward: Some(reward),
        }
    }
}
