//! Grid A* over the 8-connected lattice.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::node::{NodeArena, NodeId, PathNode};
use crate::grid::{Action, GridBounds, ObstacleSet, Position, GRID_STEP};

/// Cost of a horizontal or vertical step.
pub const ORTHOGONAL_COST: i64 = 10;
/// Cost of a diagonal step (10·√2, rounded).
pub const DIAGONAL_COST: i64 = 14;

/// Cost of taking `action` from any cell.
pub fn step_cost(action: Action) -> i64 {
    if action.is_diagonal() {
        DIAGONAL_COST
    } else {
        ORTHOGONAL_COST
    }
}

/// Manhattan distance heuristic.
pub fn heuristic(from: Position, goal: Position) -> i64 {
    i64::from(from.manhattan_distance(&goal))
}

/// Total step cost along a path of adjacent cells.
///
/// Pairs that are not a single grid move apart contribute nothing.
pub fn path_cost(path: &[Position]) -> i64 {
    path.windows(2)
        .filter_map(|pair| Action::from_delta(pair[1].x - pair[0].x, pair[1].y - pair[0].y))
        .map(step_cost)
        .sum()
}

/// Search limits for the pathfinder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PathfinderConfig {
    /// Maximum number of node expansions per search (`None` = unbounded;
    /// the grid is finite so the search always terminates).
    pub expansion_limit: Option<usize>,
}

/// Open-list entry ordered by `f`, then insertion sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct OpenEntry {
    f: i64,
    seq: u64,
    node: NodeId,
}

/// A* pathfinder bound to a world size.
#[derive(Debug, Clone)]
pub struct Pathfinder {
    bounds: GridBounds,
    config: PathfinderConfig,
}

impl Pathfinder {
    pub fn new(bounds: GridBounds) -> Self {
        Self::with_config(bounds, PathfinderConfig::default())
    }

    pub fn with_config(bounds: GridBounds, config: PathfinderConfig) -> Self {
        Self { bounds, config }
    }

    pub fn bounds(&self) -> &GridBounds {
        &self.bounds
    }

    /// Finds a path from `start` to within one grid step of `goal`.
    ///
    /// The returned waypoints run from `start` to the node that reached the
    /// goal, both inclusive. An empty vector means no route exists (or the
    /// expansion limit was hit); callers should hold position for the tick.
    ///
    /// Cells are closed on first expansion and never reopened.
    pub fn find_path<F>(&self, start: Position, goal: Position, is_blocked: F) -> Vec<Position>
    where
        F: Fn(Position) -> bool,
    {
        let reach = f64::from(GRID_STEP);
        let mut arena = NodeArena::new();
        let mut open = BinaryHeap::new();
        let mut closed: HashSet<Position> = HashSet::new();
        let mut seq = 0u64;
        let mut expansions = 0usize;

        let root = arena.push(PathNode::new(start, None, 0, heuristic(start, goal)));
        open.push(Reverse(OpenEntry {
            f: arena.get(root).f,
            seq,
            node: root,
        }));

        while let Some(Reverse(entry)) = open.pop() {
            let current = *arena.get(entry.node);
            if closed.contains(&current.position) {
                continue;
            }

            if current.position.distance_to(&goal) < reach {
                let path = arena.reconstruct(entry.node);
                trace!(
                    %start,
                    %goal,
                    length = path.len(),
                    cost = current.g,
                    expansions,
                    "path found"
                );
                return path;
            }

            closed.insert(current.position);
            expansions += 1;
            if self
                .config
                .expansion_limit
                .is_some_and(|limit| expansions > limit)
            {
                trace!(%start, %goal, expansions, "expansion limit reached");
                return Vec::new();
            }

            for action in Action::ALL {
                let next = current.position.offset(action);
                if !self.bounds.contains(next) || closed.contains(&next) || is_blocked(next) {
                    continue;
                }
                let g = current.g + step_cost(action);
                let id = arena.push(PathNode::new(next, Some(entry.node), g, heuristic(next, goal)));
                seq += 1;
                open.push(Reverse(OpenEntry {
                    f: arena.get(id).f,
                    seq,
                    node: id,
                }));
            }
        }

        trace!(%start, %goal, expansions, "open list exhausted");
        Vec::new()
    }

    /// [`Pathfinder::find_path`] with an obstacle set as the blocking query.
    pub fn find_path_around(
        &self,
        start: Position,
        goal: Position,
        obstacles: &ObstacleSet,
    ) -> Vec<Position> {
        self.find_path(start, goal, |p| obstacles.contains(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_adjacent_step(a: Position, b: Position) -> bool {
        Action::from_delta(b.x - a.x, b.y - a.y).is_some()
    }

    #[test]
    fn opposite_corners_of_three_by_three_use_diagonals() {
        let finder = Pathfinder::new(GridBounds::new(30));
        let path = finder.find_path(Position::new(0, 0), Position::new(20, 20), |_| false);
        assert_eq!(
            path,
            vec![Position::new(0, 0), Position::new(10, 10), Position::new(20, 20)]
        );
        assert_eq!(path_cost(&path), 2 * DIAGONAL_COST);
    }

    #[test]
    fn diagonal_and_orthogonal_costs_differ() {
        assert_eq!(step_cost(Action::Right), 10);
        assert_eq!(step_cost(Action::UpLeft), 14);
        let straight = [Position::new(0, 0), Position::new(10, 0), Position::new(20, 0)];
        let bent = [Position::new(0, 0), Position::new(10, 10), Position::new(20, 0)];
        assert!(path_cost(&straight) < path_cost(&bent));
    }

    #[test]
    fn prefix_costs_are_non_decreasing() {
        let finder = Pathfinder::new(GridBounds::new(200));
        let wall: Vec<Position> = (0..15).map(|i| Position::new(80, i * 10)).collect();
        let obstacles = ObstacleSet::from_segments(&wall);
        let path = finder.find_path_around(Position::new(0, 0), Position::new(150, 20), &obstacles);
        assert!(!path.is_empty());
        assert_eq!(path[0], Position::new(0, 0));
        assert!(path.last().unwrap().distance_to(&Position::new(150, 20)) < 10.0);

        let mut previous = 0;
        for end in 1..=path.len() {
            let cost = path_cost(&path[..end]);
            assert!(cost >= previous);
            previous = cost;
        }
        for pair in path.windows(2) {
            assert!(is_adjacent_step(pair[0], pair[1]));
            assert!(!obstacles.contains(pair[1]));
        }
    }

    #[test]
    fn equal_f_entries_expand_in_insertion_order() {
        // Blocking the diagonal leaves two mirror routes of equal cost. East
        // is pushed before south, so the route through (10, 0) wins.
        let pf = Pathfinder::new(GridBounds::default());
        let blocked = Position::new(10, 10);
        let path = pf.find_path(Position::new(0, 0), Position::new(20, 20), |p| p == blocked);
        assert_eq!(
            path,
            vec![
                Position::new(0, 0),
                Position::new(10, 0),
                Position::new(20, 10),
                Position::new(20, 20),
            ]
        );
        let mirror = [
            Position::new(0, 0),
            Position::new(0, 10),
            Position::new(10, 20),
            Position::new(20, 20),
        ];
        assert_eq!(path_cost(&path), path_cost(&mirror));
    }

    #[test]
    fn enclosed_goal_has_no_path() {
        let finder = Pathfinder::new(GridBounds::new(100));
        let goal = Position::new(50, 50);
        let mut obstacles = ObstacleSet::new();
        obstacles.insert(goal);
        for action in Action::ALL {
            obstacles.insert(goal.offset(action));
        }
        let path = finder.find_path_around(Position::new(0, 0), goal, &obstacles);
        assert!(path.is_empty());
    }

    #[test]
    fn start_within_reach_returns_single_node() {
        let finder = Pathfinder::new(GridBounds::new(100));
        let path = finder.find_path(Position::new(40, 40), Position::new(45, 43), |_| false);
        assert_eq!(path, vec![Position::new(40, 40)]);
    }

    #[test]
    fn non_aligned_goal_is_reached_within_one_step() {
        let finder = Pathfinder::new(GridBounds::new(200));
        let goal = Position::new(73, 128);
        let path = finder.find_path(Position::new(0, 0), goal, |_| false);
        let last = *path.last().unwrap();
        assert!(last.distance_to(&goal) < 10.0);
        assert!(last.is_aligned());
    }

    #[test]
    fn expansion_limit_aborts_search() {
        let config = PathfinderConfig {
            expansion_limit: Some(3),
        };
        let finder = Pathfinder::with_config(GridBounds::new(1000), config);
        let path = finder.find_path(Position::new(0, 0), Position::new(900, 900), |_| false);
        assert!(path.is_empty());
    }

    #[test]
    fn out_of_bounds_goal_is_unreachable() {
        let finder = Pathfinder::new(GridBounds::new(50));
        let path = finder.find_path(Position::new(0, 0), Position::new(200, 200), |_| false);
        assert!(path.is_empty());
    }
}
