//! Grid world primitives shared by every decision-making component.
//!
//! Positions live on a fixed 10-unit lattice inside `[0, size)`. Every
//! component that produces a [`Position`] goes through [`GridBounds::snap`]
//! or [`GridBounds::clamp`], so the lattice invariant is enforced in one place.

pub mod action;
pub mod history;
pub mod obstacles;
pub mod position;

pub use action::{closest_action, Action};
pub use history::PositionHistory;
pub use obstacles::ObstacleSet;
pub use position::{GridBounds, Position, GRID_STEP};
