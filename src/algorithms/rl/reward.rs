//! Composite reward function for the pursuit environment.
//!
//! Combines distance shaping toward the target's current and predicted
//! positions, a containment term driven by the target's escape paths, and a
//! damped penalty for crowding the target's body.

use super::config::RewardConfig;
use crate::grid::{Action, GridBounds, ObstacleSet, Position, GRID_STEP};

/// Per-term decomposition of one step's reward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewardBreakdown {
    pub distance: f64,
    pub containment: f64,
    /// Raw proximity penalty before damping.
    pub proximity: f64,
    pub total: f64,
}

/// Computes rewards for the pursuit environment.
#[derive(Debug, Clone)]
pub struct RewardComputer {
    config: RewardConfig,
    bounds: GridBounds,
}

impl RewardComputer {
    pub fn new(config: RewardConfig, bounds: GridBounds) -> Self {
        Self { config, bounds }
    }

    pub fn config(&self) -> &RewardConfig {
        &self.config
    }

    /// Total reward for moving the pursuer from `old` to `new`.
    ///
    /// Unclamped; callers decide what counts as divergence.
    pub fn score(
        &self,
        old: Position,
        new: Position,
        target: Position,
        predicted: Position,
        escape_paths: u32,
        obstacles: &ObstacleSet,
    ) -> f64 {
        self.breakdown(old, new, target, predicted, escape_paths, obstacles)
            .total
    }

    /// Reward split into its three components.
    ///
    /// # Components
    ///
    /// 1. **Distance**: `round((d_old - d_new) × scale)` with
    ///    `d = w_cur × |p - target|₁ + w_pred × |p - predicted|₁`.
    /// 2. **Containment**: `-penalty` per escape path above the free
    ///    threshold, `+bonus` per path below it.
    /// 3. **Proximity**: [`RewardComputer::proximity_penalty`] at `new`,
    ///    subtracted with the damping weight.
    pub fn breakdown(
        &self,
        old: Position,
        new: Position,
        target: Position,
        predicted: Position,
        escape_paths: u32,
        obstacles: &ObstacleSet,
    ) -> RewardBreakdown {
        let distance = self.distance_term(old, new, target, predicted);
        let containment = self.containment_term(escape_paths);
        let proximity = self.proximity_penalty(new, obstacles);
        RewardBreakdown {
            distance,
            containment,
            proximity,
            total: distance + containment - proximity * self.config.proximity_weight,
        }
    }

    pub fn distance_term(
        &self,
        old: Position,
        new: Position,
        target: Position,
        predicted: Position,
    ) -> f64 {
        let composite = |p: Position| {
            self.config.current_weight * f64::from(p.manhattan_distance(&target))
                + self.config.predicted_weight * f64::from(p.manhattan_distance(&predicted))
        };
        ((composite(old) - composite(new)) * self.config.distance_scale).round()
    }

    pub fn containment_term(&self, escape_paths: u32) -> f64 {
        let free = self.config.free_escape_paths;
        if escape_paths > free {
            -f64::from(escape_paths - free) * self.config.escape_penalty
        } else {
            f64::from(free - escape_paths) * self.config.trap_bonus
        }
    }

    /// Penalty for body cells one and two steps away from `at` in each of
    /// the eight directions.
    pub fn proximity_penalty(&self, at: Position, obstacles: &ObstacleSet) -> f64 {
        let cfg = &self.config;
        let mut penalty = 0.0;
        let mut nearby = 0u32;
        let mut min_distance = f64::INFINITY;

        for action in Action::ALL {
            for (factor, weight) in [(1, cfg.adjacent_penalty), (2, cfg.nearby_penalty)] {
                let cell = at.offset_by(action, factor);
                if obstacles.contains(cell) {
                    nearby += 1;
                    min_distance = min_distance.min(at.distance_to(&cell));
                    penalty += weight;
                }
            }
        }

        if nearby >= cfg.crowding_threshold {
            penalty += cfg.crowding_penalty;
        }
        if min_distance < cfg.close_distance {
            penalty += (cfg.close_base - min_distance) * cfg.close_gain;
        }
        penalty
    }

    /// Counts the target's free neighboring cells the pursuer cannot reach
    /// first.
    ///
    /// A neighbor counts when it is in bounds, not part of the body, and
    /// neither the pursuer's cell nor one of its one-move neighbors.
    pub fn count_escape_paths(
        &self,
        target: Position,
        pursuer: Position,
        obstacles: &ObstacleSet,
    ) -> u32 {
        Action::ALL
            .iter()
            .map(|&a| target.offset(a))
            .filter(|&cell| !obstacles.is_blocked(&self.bounds, cell))
            .filter(|&cell| !within_one_move(pursuer, cell))
            .count() as u32
    }
}

fn within_one_move(from: Position, cell: Position) -> bool {
    (cell.x - from.x).abs() <= GRID_STEP && (cell.y - from.y).abs() <= GRID_STEP
}
