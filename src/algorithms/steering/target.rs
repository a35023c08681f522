//! Flocking-style motion for the grid-bound target.
//!
//! The driver blends the same kinds of forces a boid feels (cohesion toward
//! its own recent path, separation from the pursuer, alignment with its last
//! displacement) plus exploration noise, then projects the continuous result
//! onto the closest discrete [`Action`]. That keeps target motion on the grid
//! the pathfinder and reward model reason about.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::grid::{closest_action, Action, GridBounds, Position, PositionHistory};

/// Tunables for the discrete target driver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetDriverConfig {
    /// Gain on the pull toward the mean of past positions.
    pub cohesion_gain: f64,
    /// Extra multiplier on cohesion.
    pub cohesion_weight: f64,
    /// Distance under which the target veers away from the pursuer.
    pub separation_threshold: f64,
    pub separation_gain: f64,
    /// Gain on the previous displacement.
    pub alignment_gain: f64,
    /// Full width of the uniform exploration noise per axis.
    pub exploration_range: f64,
    /// Full width of the breakout impulse applied when stuck.
    pub breakout_range: f64,
    /// Consecutive motionless ticks before a breakout impulse fires.
    pub stuck_ticks: u32,
    /// Speed the desired velocity is normalized to.
    pub speed: f64,
}

impl Default for TargetDriverConfig {
    fn default() -> Self {
        Self {
            cohesion_gain: 0.15,
            cohesion_weight: 1.2,
            separation_threshold: 70.0,
            separation_gain: 0.3,
            alignment_gain: 0.15,
            exploration_range: 40.0,
            breakout_range: 300.0,
            stuck_ticks: 5,
            speed: 10.0,
        }
    }
}

/// Moves the target one grid action per tick.
#[derive(Debug, Clone)]
pub struct TargetDriver {
    config: TargetDriverConfig,
    motionless: u32,
}

impl TargetDriver {
    pub fn new(config: TargetDriverConfig) -> Self {
        Self {
            config,
            motionless: 0,
        }
    }

    pub fn config(&self) -> &TargetDriverConfig {
        &self.config
    }

    /// Clears stuck tracking at the start of an episode.
    pub fn reset(&mut self) {
        self.motionless = 0;
    }

    /// Pull toward the mean of the recorded trajectory.
    pub fn cohesion(&self, target: Position, history: &PositionHistory) -> (f64, f64) {
        let Some((cx, cy)) = history.centroid() else {
            return (0.0, 0.0);
        };
        let (tx, ty) = target.as_f64();
        let gain = self.config.cohesion_gain * self.config.cohesion_weight;
        ((cx - tx) * gain, (cy - ty) * gain)
    }

    /// Unit push away from a nearby pursuer.
    pub fn separation(&self, target: Position, pursuer: Position) -> (f64, f64) {
        let distance = target.distance_to(&pursuer);
        if distance <= 0.0 || distance >= self.config.separation_threshold {
            return (0.0, 0.0);
        }
        let gain = self.config.separation_gain;
        (
            f64::from(target.x - pursuer.x) / distance * gain,
            f64::from(target.y - pursuer.y) / distance * gain,
        )
    }

    /// Continuation of the most recent displacement.
    pub fn alignment(&self, history: &PositionHistory) -> (f64, f64) {
        match (history.previous(), history.latest()) {
            (Some(prev), Some(last)) => {
                let gain = self.config.alignment_gain;
                (
                    f64::from(last.x - prev.x) * gain,
                    f64::from(last.y - prev.y) * gain,
                )
            }
            _ => (0.0, 0.0),
        }
    }

    /// Composite desired velocity, normalized to the configured speed.
    pub fn desired_velocity<R: Rng + ?Sized>(
        &self,
        target: Position,
        history: &PositionHistory,
        pursuer: Position,
        rng: &mut R,
    ) -> (f64, f64) {
        let (cx, cy) = self.cohesion(target, history);
        let (sx, sy) = self.separation(target, pursuer);
        let (ax, ay) = self.alignment(history);
        let (ex, ey) = uniform_impulse(rng, self.config.exploration_range);

        let mut vx = cx + sx + ax + ex;
        let mut vy = cy + sy + ay + ey;

        if self.config.stuck_ticks > 0 && self.motionless >= self.config.stuck_ticks {
            let (bx, by) = uniform_impulse(rng, self.config.breakout_range);
            vx += bx;
            vy += by;
        }

        let speed = vx.hypot(vy);
        if speed > 0.0 {
            vx = vx / speed * self.config.speed;
            vy = vy / speed * self.config.speed;
        }
        (vx, vy)
    }

    /// Picks the grid action closest to the desired velocity.
    ///
    /// A zero desired velocity yields a uniformly random action.
    pub fn choose_action<R: Rng + ?Sized>(
        &self,
        target: Position,
        history: &PositionHistory,
        pursuer: Position,
        rng: &mut R,
    ) -> Action {
        let (vx, vy) = self.desired_velocity(target, history, pursuer, rng);
        closest_action(vx, vy).unwrap_or_else(|| Action::ALL[rng.gen_range(0..Action::COUNT)])
    }

    /// Advances the target by one action and returns its new position.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        target: Position,
        history: &PositionHistory,
        pursuer: Position,
        bounds: &GridBounds,
        rng: &mut R,
    ) -> Position {
        let action = self.choose_action(target, history, pursuer, rng);
        let next = bounds.apply(target, action);

        if next == target {
            self.motionless += 1;
        } else {
            self.motionless = 0;
        }
        trace!(from = %target, to = %next, %action, motionless = self.motionless, "target step");
        next
    }
}

fn uniform_impulse<R: Rng + ?Sized>(rng: &mut R, range: f64) -> (f64, f64) {
    if range <= 0.0 {
        return (0.0, 0.0);
    }
    (
        (rng.gen::<f64>() - 0.5) * range,
        (rng.gen::<f64>() - 0.5) * range,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn quiet_config() -> TargetDriverConfig {
        TargetDriverConfig {
            exploration_range: 0.0,
            breakout_range: 0.0,
            ..TargetDriverConfig::default()
        }
    }

    #[test]
    fn target_flees_a_close_pursuer() {
        let driver = TargetDriver::new(quiet_config());
        let mut rng = StdRng::seed_from_u64(0);
        let target = Position::new(500, 500);
        let history = PositionHistory::from_samples(10, [target]);
        let action = driver.choose_action(target, &history, Position::new(470, 500), &mut rng);
        assert_eq!(action, Action::Right);
    }

    #[test]
    fn target_keeps_its_heading_without_other_forces() {
        let driver = TargetDriver::new(TargetDriverConfig {
            cohesion_gain: 0.0,
            ..quiet_config()
        });
        let mut rng = StdRng::seed_from_u64(0);
        let history =
            PositionHistory::from_samples(10, [Position::new(100, 100), Position::new(110, 90)]);
        let action = driver.choose_action(
            Position::new(110, 90),
            &history,
            Position::new(900, 900),
            &mut rng,
        );
        assert_eq!(action, Action::UpRight);
    }

    #[test]
    fn desired_velocity_is_normalized() {
        let driver = TargetDriver::new(TargetDriverConfig::default());
        let mut rng = StdRng::seed_from_u64(4);
        let history = PositionHistory::from_samples(10, [Position::new(0, 0), Position::new(10, 0)]);
        let (vx, vy) = driver.desired_velocity(Position::new(10, 0), &history, Position::new(40, 0), &mut rng);
        assert!((vx.hypot(vy) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn step_stays_on_grid_and_in_bounds() {
        let bounds = GridBounds::new(200);
        let mut driver = TargetDriver::new(TargetDriverConfig::default());
        let mut rng = StdRng::seed_from_u64(21);
        let mut history = PositionHistory::new(10);
        let mut target = Position::new(190, 190);
        for _ in 0..200 {
            history.push(target);
            target = driver.step(target, &history, Position::new(0, 0), &bounds, &mut rng);
            assert!(bounds.contains(target));
            assert!(target.is_aligned());
        }
    }

    #[test]
    fn zero_velocity_still_moves() {
        let driver = TargetDriver::new(quiet_config());
        let mut rng = StdRng::seed_from_u64(8);
        let target = Position::new(300, 300);
        let history = PositionHistory::from_samples(10, [target]);
        let action = driver.choose_action(target, &history, Position::new(900, 900), &mut rng);
        assert!(Action::ALL.contains(&action));
    }
}
