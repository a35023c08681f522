//! The eight discrete moves available to grid agents.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::position::GRID_STEP;

/// One of the eight fixed grid moves.
///
/// Directions follow screen orientation (`Down` increases `y`). The
/// declaration order is the canonical action order used for tie-breaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    Right,
    Left,
    Down,
    Up,
    DownRight,
    DownLeft,
    UpRight,
    UpLeft,
}

impl Action {
    /// All actions in canonical order.
    pub const ALL: [Action; 8] = [
        Action::Right,
        Action::Left,
        Action::Down,
        Action::Up,
        Action::DownRight,
        Action::DownLeft,
        Action::UpRight,
        Action::UpLeft,
    ];

    /// Number of discrete actions.
    pub const COUNT: usize = 8;

    /// Displacement `(dx, dy)` in world units.
    pub fn delta(&self) -> (i32, i32) {
        let s = GRID_STEP;
        match self {
            Action::Right => (s, 0),
            Action::Left => (-s, 0),
            Action::Down => (0, s),
            Action::Up => (0, -s),
            Action::DownRight => (s, s),
            Action::DownLeft => (-s, s),
            Action::UpRight => (s, -s),
            Action::UpLeft => (-s, -s),
        }
    }

    /// Looks up the action with the given displacement.
    pub fn from_delta(dx: i32, dy: i32) -> Option<Action> {
        Self::ALL.into_iter().find(|a| a.delta() == (dx, dy))
    }

    /// Index of this action in [`Action::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Action at `index` in canonical order.
    pub fn from_index(index: usize) -> Option<Action> {
        Self::ALL.get(index).copied()
    }

    /// Returns true for the four diagonal moves.
    pub fn is_diagonal(&self) -> bool {
        let (dx, dy) = self.delta();
        dx != 0 && dy != 0
    }

    /// Euclidean length of the move (10 or 10√2).
    pub fn magnitude(&self) -> f64 {
        let (dx, dy) = self.delta();
        f64::from(dx).hypot(f64::from(dy))
    }

    /// The opposite move.
    pub fn reversed(&self) -> Action {
        match self {
            Action::Right => Action::Left,
            Action::Left => Action::Right,
            Action::Down => Action::Up,
            Action::Up => Action::Down,
            Action::DownRight => Action::UpLeft,
            Action::DownLeft => Action::UpRight,
            Action::UpRight => Action::DownLeft,
            Action::UpLeft => Action::DownRight,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Right => "right",
            Action::Left => "left",
            Action::Down => "down",
            Action::Up => "up",
            Action::DownRight => "down-right",
            Action::DownLeft => "down-left",
            Action::UpRight => "up-right",
            Action::UpLeft => "up-left",
        };
        f.write_str(name)
    }
}

/// Projects a continuous velocity onto the action with the highest cosine
/// similarity.
///
/// Returns `None` for a zero (or non-finite) velocity, where every direction
/// is equally similar.
pub fn closest_action(vx: f64, vy: f64) -> Option<Action> {
    let magnitude = vx.hypot(vy);
    if !magnitude.is_finite() || magnitude < 1e-9 {
        return None;
    }

    let mut best = None;
    let mut best_similarity = f64::NEG_INFINITY;
    for action in Action::ALL {
        let (dx, dy) = action.delta();
        let dot = vx * f64::from(dx) + vy * f64::from(dy);
        let similarity = dot / (magnitude * action.magnitude());
        if similarity > best_similarity {
            best_similarity = similarity;
            best = Some(action);
        }
    }
    best
}
