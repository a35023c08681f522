//! A single flocking agent and its steering forces.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::Id;

/// Per-agent flocking tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoidParams {
    /// Radius within which other agents count as neighbors.
    pub view_distance: f64,
    /// Distance under which agents push each other apart.
    pub separation_distance: f64,
    /// Margin from the world edge at which velocity is reflected.
    pub border_padding: f64,
    pub min_speed: f64,
    pub max_speed: f64,
    /// Gain applied to the pull toward the neighbor centroid.
    pub cohesion_gain: f64,
    /// Gain applied to the inverse-distance push from close neighbors.
    pub separation_gain: f64,
    /// Gain applied to the velocity-matching pull.
    pub alignment_gain: f64,
    /// Magnitude of the radial push applied per overlapping agent.
    pub overlap_push: f64,
}

impl Default for BoidParams {
    fn default() -> Self {
        Self {
            view_distance: 50.0,
            separation_distance: 20.0,
            border_padding: 10.0,
            min_speed: 0.5,
            max_speed: 1.5,
            cohesion_gain: 0.005,
            separation_gain: 0.05,
            alignment_gain: 0.05,
            overlap_push: 0.5,
        }
    }
}

/// A flocking agent with continuous position and velocity.
#[derive(Debug, Clone, PartialEq)]
pub struct Boid {
    pub id: Id,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub params: BoidParams,
}

impl Boid {
    pub fn new(id: Id, x: f64, y: f64, vx: f64, vy: f64, params: BoidParams) -> Self {
        Self {
            id,
            x,
            y,
            vx,
            vy,
            params,
        }
    }

    pub fn distance_to(&self, other: &Boid) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn distance_to_point(&self, x: f64, y: f64) -> f64 {
        (x - self.x).hypot(y - self.y)
    }

    pub fn speed(&self) -> f64 {
        self.vx.hypot(self.vy)
    }

    /// Other agents within view distance.
    pub fn neighbors<'a>(&'a self, flock: &'a [Boid]) -> impl Iterator<Item = &'a Boid> + 'a {
        flock
            .iter()
            .filter(move |other| other.id != self.id && self.distance_to(other) < self.params.view_distance)
    }

    /// Pull toward the centroid of neighbors.
    pub fn cohesion(&self, flock: &[Boid]) -> (f64, f64) {
        let (count, sx, sy) = self
            .neighbors(flock)
            .fold((0usize, 0.0, 0.0), |(n, sx, sy), b| (n + 1, sx + b.x, sy + b.y));
        if count == 0 {
            return (0.0, 0.0);
        }
        let (cx, cy) = (sx / count as f64, sy / count as f64);
        let gain = self.params.cohesion_gain;
        ((cx - self.x) * gain, (cy - self.y) * gain)
    }

    /// Inverse-distance push away from neighbors closer than the separation
    /// distance.
    pub fn separation(&self, flock: &[Boid]) -> (f64, f64) {
        let (mx, my) = self
            .neighbors(flock)
            .filter_map(|b| {
                let d = self.distance_to(b);
                (d > 0.0 && d < self.params.separation_distance)
                    .then(|| ((self.x - b.x) / d, (self.y - b.y) / d))
            })
            .fold((0.0, 0.0), |(ax, ay), (dx, dy)| (ax + dx, ay + dy));
        let gain = self.params.separation_gain;
        (mx * gain, my * gain)
    }

    /// Pull toward the average neighbor velocity.
    pub fn alignment(&self, flock: &[Boid]) -> (f64, f64) {
        let (count, svx, svy) = self
            .neighbors(flock)
            .fold((0usize, 0.0, 0.0), |(n, sx, sy), b| (n + 1, sx + b.vx, sy + b.vy));
        if count == 0 {
            return (0.0, 0.0);
        }
        let (avx, avy) = (svx / count as f64, svy / count as f64);
        let gain = self.params.alignment_gain;
        ((avx - self.vx) * gain, (avy - self.vy) * gain)
    }

    /// Sum of cohesion, separation and alignment.
    pub fn flocking_force(&self, flock: &[Boid]) -> (f64, f64) {
        let (cx, cy) = self.cohesion(flock);
        let (sx, sy) = self.separation(flock);
        let (ax, ay) = self.alignment(flock);
        (cx + sx + ax, cy + sy + ay)
    }

    /// Radial push away from every agent overlapping this one.
    pub fn overlap_push(&self, flock: &[Boid]) -> (f64, f64) {
        flock
            .iter()
            .filter(|b| b.id != self.id && self.distance_to(b) < self.params.separation_distance)
            .map(|b| {
                let angle = (self.y - b.y).atan2(self.x - b.x);
                (
                    angle.cos() * self.params.overlap_push,
                    angle.sin() * self.params.overlap_push,
                )
            })
            .fold((0.0, 0.0), |(ax, ay), (dx, dy)| (ax + dx, ay + dy))
    }

    /// Rescales velocity into `[min_speed, max_speed]`.
    ///
    /// A stationary agent is given a random heading at minimum speed.
    pub fn limit_speed<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let speed = self.speed();
        let (min, max) = (self.params.min_speed, self.params.max_speed);
        if speed < 1e-12 {
            let angle = rng.gen_range(0.0..std::f64::consts::TAU);
            self.vx = angle.cos() * min;
            self.vy = angle.sin() * min;
        } else if speed > max {
            self.vx = self.vx / speed * max;
            self.vy = self.vy / speed * max;
        } else if speed < min {
            self.vx = self.vx / speed * min;
            self.vy = self.vy / speed * min;
        }
    }

    /// Points each velocity component back toward the interior when the
    /// agent is within the border padding of an edge.
    pub fn reflect_at_border(&mut self, world_size: f64) {
        let pad = self.params.border_padding;
        if self.x < pad {
            self.vx = self.vx.abs();
        } else if self.x > world_size - pad {
            self.vx = -self.vx.abs();
        }
        if self.y < pad {
            self.vy = self.vy.abs();
        } else if self.y > world_size - pad {
            self.vy = -self.vy.abs();
        }
    }
}
