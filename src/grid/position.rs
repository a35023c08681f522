//! Grid positions and world bounds.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::action::Action;

/// Spacing between adjacent grid cells, in world units.
pub const GRID_STEP: i32 = 10;

/// A cell on the pursuit grid.
///
/// Coordinates use screen orientation: `x` grows to the right, `y` grows down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Origin position (0, 0).
    pub const fn origin() -> Self {
        Self { x: 0, y: 0 }
    }

    /// Manhattan (L1) distance to another position.
    pub fn manhattan_distance(&self, other: &Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Euclidean distance to another position.
    pub fn distance_to(&self, other: &Position) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        dx.hypot(dy)
    }

    /// Position reached by applying `action`, without any bounds handling.
    pub fn offset(&self, action: Action) -> Position {
        let (dx, dy) = action.delta();
        Position::new(self.x + dx, self.y + dy)
    }

    /// Position displaced by `factor` applications of `action`.
    pub fn offset_by(&self, action: Action, factor: i32) -> Position {
        let (dx, dy) = action.delta();
        Position::new(self.x + dx * factor, self.y + dy * factor)
    }

    /// Coordinates as floating point, for continuous math.
    pub fn as_f64(&self) -> (f64, f64) {
        (f64::from(self.x), f64::from(self.y))
    }

    /// Returns true if both coordinates sit on the grid lattice.
    pub fn is_aligned(&self) -> bool {
        self.x % GRID_STEP == 0 && self.y % GRID_STEP == 0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Square world bounds `[0, size) × [0, size)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridBounds {
    /// Side length of the world, in world units.
    pub size: i32,
}

impl GridBounds {
    /// Creates bounds for a square world of the given side length.
    pub const fn new(size: i32) -> Self {
        Self { size }
    }

    /// Largest lattice coordinate strictly inside the world.
    pub fn max_cell(&self) -> i32 {
        ((self.size - 1).max(0) / GRID_STEP) * GRID_STEP
    }

    /// Number of lattice cells along one axis.
    pub fn cells_per_axis(&self) -> usize {
        (self.max_cell() / GRID_STEP + 1) as usize
    }

    /// Returns true if `position` lies inside `[0, size)` on both axes.
    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0 && position.y >= 0 && position.x < self.size && position.y < self.size
    }

    /// Clamps an aligned position to the in-bounds lattice.
    pub fn clamp(&self, position: Position) -> Position {
        let max = self.max_cell();
        Position::new(position.x.clamp(0, max), position.y.clamp(0, max))
    }

    /// Snaps a continuous point to the nearest lattice cell, then clamps it.
    ///
    /// Non-finite coordinates snap to 0 on that axis.
    pub fn snap(&self, x: f64, y: f64) -> Position {
        self.clamp(Position::new(snap_axis(x), snap_axis(y)))
    }

    /// Snaps an integer position that may be off the lattice.
    pub fn snap_position(&self, position: Position) -> Position {
        let (x, y) = position.as_f64();
        self.snap(x, y)
    }

    /// Applies `action` to `position` and keeps the result in bounds.
    pub fn apply(&self, position: Position, action: Action) -> Position {
        self.clamp(position.offset(action))
    }

    /// Uniformly random lattice cell.
    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        let cells = self.cells_per_axis() as i32;
        Position::new(
            rng.gen_range(0..cells) * GRID_STEP,
            rng.gen_range(0..cells) * GRID_STEP,
        )
    }
}

impl Default for GridBounds {
    fn default() -> Self {
        Self { size: 1000 }
    }
}

fn snap_axis(value: f64) -> i32 {
    if !value.is_finite() {
        return 0;
    }
    let step = f64::from(GRID_STEP);
    ((value / step).round() * step) as i32
}
