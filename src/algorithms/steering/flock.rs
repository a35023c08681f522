//! A collection of boids stepped together.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::boid::{Boid, BoidParams};
use super::error::SteeringError;
use crate::config::PursuitConfig;
use crate::{generate_id, Id};

/// Number of random placements tried before spawning gives up.
pub const DEFAULT_SPAWN_ATTEMPTS: usize = 1_000;

/// Agents spawn at least this many separation distances apart.
const SPAWN_CLEARANCE: f64 = 1.5;

/// A flock of boids living in a square world of side `world_size`.
///
/// # Lifecycle
///
/// 1. Create with [`Flock::new`] or [`Flock::populate`].
/// 2. Call [`Flock::step`] once per tick.
/// 3. When the game layer consumes an agent, call [`Flock::replace`] or
///    [`Flock::consume_near`]; the consumed agent is dropped and a fresh one
///    spawns elsewhere.
#[derive(Debug)]
pub struct Flock {
    boids: Vec<Boid>,
    world_size: f64,
    params: BoidParams,
    rng: StdRng,
    spawn_attempts: usize,
}

impl Flock {
    /// Creates an empty flock with a seeded RNG.
    pub fn new(world_size: f64, params: BoidParams, seed: u64) -> Self {
        Self {
            boids: Vec::new(),
            world_size,
            params,
            rng: StdRng::seed_from_u64(seed),
            spawn_attempts: DEFAULT_SPAWN_ATTEMPTS,
        }
    }

    /// Creates a flock and spawns `count` non-overlapping agents.
    pub fn populate(
        world_size: f64,
        params: BoidParams,
        count: usize,
        seed: u64,
    ) -> Result<Self, SteeringError> {
        let mut flock = Self::new(world_size, params, seed);
        for _ in 0..count {
            flock.spawn()?;
        }
        debug!(count, world_size, "flock populated");
        Ok(flock)
    }

    /// Populates a flock over the configured grid with the configured
    /// boid parameters.
    pub fn from_config(config: &PursuitConfig, count: usize, seed: u64) -> Result<Self, SteeringError> {
        Self::populate(f64::from(config.grid.size), config.boids, count, seed)
    }

    /// Overrides the number of placement attempts per spawn.
    pub fn with_spawn_attempts(mut self, attempts: usize) -> Self {
        self.spawn_attempts = attempts.max(1);
        self
    }

    pub fn world_size(&self) -> f64 {
        self.world_size
    }

    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    pub fn len(&self) -> usize {
        self.boids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boids.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Boid> {
        self.boids.iter().find(|b| b.id == id)
    }

    /// Adds an agent at a caller-chosen position, bypassing spawn checks.
    pub fn insert(&mut self, boid: Boid) {
        self.boids.push(boid);
    }

    /// Spawns an agent at a random position clear of all existing agents.
    pub fn spawn(&mut self) -> Result<Id, SteeringError> {
        let clearance = self.params.separation_distance * SPAWN_CLEARANCE;
        for _ in 0..self.spawn_attempts {
            let x = self.rng.gen::<f64>() * self.world_size;
            let y = self.rng.gen::<f64>() * self.world_size;
            let clear = self
                .boids
                .iter()
                .all(|b| b.distance_to_point(x, y) >= clearance);
            if clear {
                let vx = (self.rng.gen::<f64>() - 0.5) * 2.0;
                let vy = (self.rng.gen::<f64>() - 0.5) * 2.0;
                let id = generate_id();
                self.boids
                    .push(Boid::new(id.clone(), x, y, vx, vy, self.params));
                return Ok(id);
            }
        }
        Err(SteeringError::NoFreeSpawnPosition {
            attempts: self.spawn_attempts,
        })
    }

    /// Advances every agent by one tick.
    ///
    /// Forces are computed against the flock as it was at the start of the
    /// tick, so update order does not matter.
    pub fn step(&mut self) {
        let snapshot = self.boids.clone();
        for boid in &mut self.boids {
            let (fx, fy) = boid.flocking_force(&snapshot);
            boid.vx += fx;
            boid.vy += fy;

            let (ox, oy) = boid.overlap_push(&snapshot);
            boid.vx += ox;
            boid.vy += oy;

            boid.limit_speed(&mut self.rng);
            boid.x += boid.vx;
            boid.y += boid.vy;
            boid.reflect_at_border(self.world_size);
        }
    }

    /// Removes the agent `id` and spawns a replacement; returns the new id.
    pub fn replace(&mut self, id: &str) -> Result<Id, SteeringError> {
        let index = self
            .boids
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| SteeringError::UnknownBoid(id.to_string()))?;
        self.boids.remove(index);
        self.spawn()
    }

    /// Consumes the first agent within `radius` of `(x, y)`, if any.
    ///
    /// Returns the id of the consumed agent; a replacement is spawned.
    pub fn consume_near(&mut self, x: f64, y: f64, radius: f64) -> Result<Option<Id>, SteeringError> {
        let hit = self
            .boids
            .iter()
            .find(|b| b.distance_to_point(x, y) < radius)
            .map(|b| b.id.clone());
        match hit {
            Some(id) => {
                self.replace(&id)?;
                Ok(Some(id))
            }
            None => Ok(None),
        }
    }
}
