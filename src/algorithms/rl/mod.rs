//! Tabular Q-learning pursuit.
//!
//! The pursuer's state is the pair of lattice cells it and the target occupy;
//! actions are the eight grid moves. [`Trainer`] runs offline episodes in a
//! [`PursuitEnvironment`] where the target is steered by a flocking driver,
//! and [`LivePursuer`] uses the same table (or plain A*) during play.

pub mod config;
pub mod environment;
pub mod live;
pub mod metrics;
pub mod policy;
pub mod q_table;
pub mod reward;
pub mod training;
pub mod types;

pub use config::{QLearningConfig, RewardConfig, TrainingConfig, LIVE_EPSILON, TRAINING_EPSILON};
pub use environment::{PursuitEnvironment, SimulationState, StepResult, Termination};
pub use live::{LivePursuer, LiveStrategy, TickOutcome};
pub use metrics::EvaluationMetrics;
pub use policy::{GreedyChasePolicy, Policy, QPolicy, RandomPolicy};
pub use q_table::QTable;
pub use reward::{RewardBreakdown, RewardComputer};
pub use training::{EpisodeReport, Trainer, TrainingSummary};
pub use types::{KeyParseError, QKey, StateKey, Transition};
