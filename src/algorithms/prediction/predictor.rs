//! Short-term target position prediction.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::regression::weighted_fit;
use crate::grid::{GridBounds, Position, PositionHistory};

/// Configuration for the trajectory predictor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    /// Maximum number of recent samples used in the fit.
    pub history_size: usize,
    /// Ticks ahead used for moment-to-moment reward shaping.
    pub short_lookahead: u32,
    /// Ticks ahead used when planning a path toward the target.
    pub long_lookahead: u32,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            history_size: 10,
            short_lookahead: 3,
            long_lookahead: 20,
        }
    }
}

/// Extrapolates the target's future position from its recent trajectory.
///
/// Each axis is fitted independently with [`weighted_fit`], then evaluated
/// at `t = n + lookahead`. Any degenerate fit falls back to the last known
/// sample, so callers always receive an in-bounds lattice cell.
#[derive(Debug, Clone)]
pub struct TrajectoryPredictor {
    config: PredictorConfig,
    bounds: GridBounds,
}

impl TrajectoryPredictor {
    pub fn new(config: PredictorConfig, bounds: GridBounds) -> Self {
        Self { config, bounds }
    }

    pub fn config(&self) -> &PredictorConfig {
        &self.config
    }

    /// Predicted position `lookahead` ticks past the newest sample.
    ///
    /// With fewer than two samples this returns the newest sample, or
    /// `fallback` when the history is empty.
    pub fn predict(
        &self,
        history: &PositionHistory,
        lookahead: u32,
        fallback: Position,
    ) -> Position {
        let last = history.latest().unwrap_or(fallback);
        if history.len() < 2 {
            return last;
        }

        match self.extrapolate(history, lookahead) {
            Some((x, y)) => self.bounds.snap(x, y),
            None => {
                debug!(samples = history.len(), "degenerate trajectory fit, using last sample");
                last
            }
        }
    }

    /// Prediction with the configured short lookahead.
    pub fn predict_short(&self, history: &PositionHistory, fallback: Position) -> Position {
        self.predict(history, self.config.short_lookahead, fallback)
    }

    /// Prediction with the configured long lookahead.
    pub fn predict_long(&self, history: &PositionHistory, fallback: Position) -> Position {
        self.predict(history, self.config.long_lookahead, fallback)
    }

    /// Raw extrapolated point before snapping and clamping.
    ///
    /// Returns `None` if there are fewer than two samples or either axis fit
    /// is degenerate.
    pub fn extrapolate(&self, history: &PositionHistory, lookahead: u32) -> Option<(f64, f64)> {
        let n = history.len().min(self.config.history_size);
        if n < 2 {
            return None;
        }

        let (xs, ys): (Vec<f64>, Vec<f64>) = history
            .recent(n)
            .map(|p| (f64::from(p.x), f64::from(p.y)))
            .unzip();

        let fit_x = weighted_fit(&xs)?;
        let fit_y = weighted_fit(&ys)?;

        let t = n as f64 + f64::from(lookahead);
        let (x, y) = (fit_x.at(t), fit_y.at(t));
        if x.is_finite() && y.is_finite() {
            Some((x, y))
        } else {
            None
        }
    }
}
