//! Pursuit algorithms: trajectory prediction, grid pathfinding, boid
//! steering and Q-learning.

pub mod pathfinding;
pub mod prediction;
pub mod rl;
pub mod steering;

pub use pathfinding::Pathfinder;
pub use prediction::TrajectoryPredictor;
