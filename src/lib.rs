//! pursuit - grid pursuit AI
//!
//! A single pursuer chases a moving target on a square lattice. The crate
//! combines short-term trajectory prediction, A* pathfinding around the
//! target's body, boids-style steering and a tabular Q-learning policy that
//! can be trained offline and persisted between sessions.

pub mod algorithms;
pub mod config;
pub mod grid;
pub mod persistence;

pub use config::{ConfigError, PursuitConfig};
pub use grid::{Action, GridBounds, Position};

/// Identifier type used for boids and other spawned entities.
pub type Id = String;

/// Generates a new unique identifier (UUID v4).
pub fn generate_id() -> Id {
    uuid::Uuid::new_v4().to_string()
}
