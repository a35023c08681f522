//! Offline Q-learning training loop.

use std::fmt;

use tracing::{debug, info};

use super::environment::{PursuitEnvironment, Termination};
use super::policy::{Policy, QPolicy};
use super::q_table::QTable;
use crate::config::PursuitConfig;
use crate::persistence::{save_best_effort, TableStore};

/// Outcome of one training episode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeReport {
    /// Zero-based episode index within this trainer.
    pub episode: u32,
    pub steps: u32,
    pub total_reward: f64,
    pub termination: Termination,
    /// Table size after the episode.
    pub table_size: usize,
}

/// Aggregate statistics over a training run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingSummary {
    pub episodes: u32,
    pub captures: u32,
    pub aborts: u32,
    pub mean_reward: f64,
    pub mean_steps: f64,
    pub table_size: usize,
}

impl TrainingSummary {
    fn from_reports(reports: &[EpisodeReport], table_size: usize) -> Self {
        if reports.is_empty() {
            return Self {
                table_size,
                ..Self::default()
            };
        }
        let n = reports.len() as f64;
        let count = |t: Termination| reports.iter().filter(|r| r.termination == t).count() as u32;
        Self {
            episodes: reports.len() as u32,
            captures: count(Termination::Captured),
            aborts: count(Termination::RewardThreshold),
            mean_reward: reports.iter().map(|r| r.total_reward).sum::<f64>() / n,
            mean_steps: reports.iter().map(|r| f64::from(r.steps)).sum::<f64>() / n,
            table_size,
        }
    }
}

impl fmt::Display for TrainingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Training Summary ({} episodes) ===", self.episodes)?;
        writeln!(f, "  Captures:           {}", self.captures)?;
        writeln!(f, "  Aborted episodes:   {}", self.aborts)?;
        writeln!(f, "  Mean reward:        {:.2}", self.mean_reward)?;
        writeln!(f, "  Mean steps:         {:.1}", self.mean_steps)?;
        writeln!(f, "  Q-table entries:    {}", self.table_size)
    }
}

/// Runs episodes of [`PursuitEnvironment`] with a [`QPolicy`], saving the
/// table after each one when a store is attached.
pub struct Trainer {
    env: PursuitEnvironment,
    policy: QPolicy,
    store: Option<Box<dyn TableStore>>,
    episodes_run: u32,
}

impl Trainer {
    /// Creates a trainer continuing from `table`.
    ///
    /// The environment and policy are both seeded from the training seed.
    pub fn new(config: &PursuitConfig, table: QTable) -> Self {
        let seed = config.training.seed;
        Self {
            env: PursuitEnvironment::new(config, seed),
            policy: QPolicy::with_table(config.q_learning, table, seed.wrapping_add(1)),
            store: None,
            episodes_run: 0,
        }
    }

    /// Attaches a store the table is written to after every episode.
    pub fn with_store(mut self, store: Box<dyn TableStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn policy(&self) -> &QPolicy {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut QPolicy {
        &mut self.policy
    }

    pub fn into_policy(self) -> QPolicy {
        self.policy
    }

    pub fn environment(&self) -> &PursuitEnvironment {
        &self.env
    }

    pub fn environment_mut(&mut self) -> &mut PursuitEnvironment {
        &mut self.env
    }

    /// Runs one episode from a fresh random start.
    pub fn run_episode(&mut self) -> EpisodeReport {
        let mut state = self.env.reset();
        let termination = loop {
            let action = self.policy.choose_action(&state);
            let result = self.env.step(action);
            self.policy.observe(&result.transition);
            state = self.env.state.key();
            if let Some(termination) = result.termination {
                break termination;
            }
        };

        let report = EpisodeReport {
            episode: self.episodes_run,
            steps: self.env.t,
            total_reward: self.env.cumulative_reward,
            termination,
            table_size: self.policy.table().len(),
        };
        self.episodes_run += 1;

        if let Some(store) = self.store.as_deref_mut() {
            save_best_effort(store, self.policy.table());
        }
        debug!(
            episode = report.episode,
            steps = report.steps,
            reward = report.total_reward,
            termination = ?report.termination,
            entries = report.table_size,
            "episode finished"
        );
        report
    }

    /// Runs `episodes` episodes in sequence.
    pub fn run(&mut self, episodes: u32) -> TrainingSummary {
        info!(episodes, "training started");
        let reports: Vec<EpisodeReport> = (0..episodes).map(|_| self.run_episode()).collect();
        let summary = TrainingSummary::from_reports(&reports, self.policy.table().len());
        info!(
            episodes = summary.episodes,
            captures = summary.captures,
            aborts = summary.aborts,
            mean_reward = summary.mean_reward,
            entries = summary.table_size,
            "training finished"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::JsonFileStore;

    fn short_config() -> PursuitConfig {
        let mut config = PursuitConfig::default();
        config.grid.size = 200;
        config.training.max_steps = 40;
        config
    }

    #[test]
    fn episode_respects_step_cap() {
        let mut trainer = Trainer::new(&short_config(), QTable::new());
        for _ in 0..5 {
            let report = trainer.run_episode();
            assert!(report.steps >= 1 && report.steps <= 40);
            if report.termination == Termination::StepCap {
                assert_eq!(report.steps, 40);
            }
        }
    }

    #[test]
    fn training_grows_the_table() {
        let mut trainer = Trainer::new(&short_config(), QTable::new());
        let summary = trainer.run(10);
        assert_eq!(summary.episodes, 10);
        assert!(summary.table_size > 0);
        assert!(summary.mean_steps >= 1.0);
        assert!(summary.captures + summary.aborts <= 10);
    }

    #[test]
    fn table_is_saved_after_each_episode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("q.json");
        let mut trainer = Trainer::new(&short_config(), QTable::new())
            .with_store(Box::new(JsonFileStore::new(&path)));
        trainer.run_episode();
        let saved = JsonFileStore::new(&path).load().unwrap();
        assert_eq!(&saved, trainer.policy().table());
    }

    #[test]
    fn same_seed_same_summary() {
        let a = Trainer::new(&short_config(), QTable::new()).run(3);
        let b = Trainer::new(&short_config(), QTable::new()).run(3);
        assert_eq!(a, b);
    }

    #[test]
    fn empty_run_reports_zeros() {
        let summary = Trainer::new(&short_config(), QTable::new()).run(0);
        assert_eq!(summary.episodes, 0);
        assert_eq!(summary.mean_reward, 0.0);
    }
}
