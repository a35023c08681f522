//! Cells occupied by the target's trailing body.

use std::collections::HashSet;

use super::position::{GridBounds, Position};

/// Set of blocked cells, rebuilt each tick from the target's segments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObstacleSet {
    cells: HashSet<Position>,
}

impl ObstacleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the set from a list of body segments.
    pub fn from_segments<'a>(segments: impl IntoIterator<Item = &'a Position>) -> Self {
        Self {
            cells: segments.into_iter().copied().collect(),
        }
    }

    /// Replaces the contents with the given segments.
    pub fn rebuild<'a>(&mut self, segments: impl IntoIterator<Item = &'a Position>) {
        self.cells.clear();
        self.cells.extend(segments.into_iter().copied());
    }

    pub fn insert(&mut self, position: Position) {
        self.cells.insert(position);
    }

    pub fn contains(&self, position: Position) -> bool {
        self.cells.contains(&position)
    }

    /// Returns true if `position` is occupied or outside `bounds`.
    pub fn is_blocked(&self, bounds: &GridBounds, position: Position) -> bool {
        !bounds.contains(position) || self.contains(position)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.cells.iter()
    }
}
