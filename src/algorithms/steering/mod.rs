//! Boids-style steering.
//!
//! [`Flock`] drives continuous decorative agents during live play.
//! [`TargetDriver`] applies the same forces to the grid-bound target during
//! training, projecting each tick's desired velocity onto a discrete action.

pub mod boid;
pub mod error;
pub mod flock;
pub mod target;

pub use boid::{Boid, BoidParams};
pub use error::SteeringError;
pub use flock::Flock;
pub use target::{TargetDriver, TargetDriverConfig};
