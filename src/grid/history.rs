//! Bounded trajectory history.

use std::collections::VecDeque;

use super::position::Position;

/// Ring buffer of recent target positions, oldest first.
///
/// Pushing beyond capacity discards the oldest sample.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionHistory {
    samples: VecDeque<Position>,
    capacity: usize,
}

impl PositionHistory {
    /// Creates an empty history holding at most `capacity` samples (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Builds a history from samples, oldest first, keeping the newest ones.
    pub fn from_samples(capacity: usize, samples: impl IntoIterator<Item = Position>) -> Self {
        let mut history = Self::new(capacity);
        for sample in samples {
            history.push(sample);
        }
        history
    }

    /// Appends the newest sample.
    pub fn push(&mut self, position: Position) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(position);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent sample.
    pub fn latest(&self) -> Option<Position> {
        self.samples.back().copied()
    }

    /// Sample immediately before the most recent one.
    pub fn previous(&self) -> Option<Position> {
        let len = self.samples.len();
        if len < 2 {
            None
        } else {
            self.samples.get(len - 2).copied()
        }
    }

    /// Iterates samples from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.samples.iter()
    }

    /// The newest `n` samples, oldest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &Position> {
        let skip = self.samples.len().saturating_sub(n);
        self.samples.iter().skip(skip)
    }

    /// Mean of all samples, or `None` when empty.
    pub fn centroid(&self) -> Option<(f64, f64)> {
        if self.samples.is_empty() {
            return None;
        }
        let n = self.samples.len() as f64;
        let (sx, sy) = self.samples.iter().fold((0.0, 0.0), |(sx, sy), p| {
            (sx + f64::from(p.x), sy + f64::from(p.y))
        });
        Some((sx / n, sy / n))
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
