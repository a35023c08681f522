//! Trajectory prediction for the pursued target.

pub mod predictor;
pub mod regression;

pub use predictor::{PredictorConfig, TrajectoryPredictor};
pub use regression::{exponential_weight, weighted_fit, LinearFit};
