//! Obstacle-aware grid pathfinding.

pub mod astar;
pub mod node;

pub use astar::{
    heuristic, path_cost, step_cost, Pathfinder, PathfinderConfig, DIAGONAL_COST,
    ORTHOGONAL_COST,
};
pub use node::{NodeArena, NodeId, PathNode};
