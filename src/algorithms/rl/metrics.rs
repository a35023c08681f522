//! Evaluation metrics for the pursuit environment.
//!
//! Runs a policy without learning and aggregates episode-level outcomes.

use std::fmt;

use super::environment::{PursuitEnvironment, Termination};
use super::policy::Policy;

/// Aggregated evaluation metrics over multiple episodes.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationMetrics {
    /// Fraction of episodes ending in a capture.
    pub capture_rate: f64,
    /// Fraction of episodes aborted for reward divergence.
    pub abort_rate: f64,
    /// Mean cumulative reward per episode.
    pub mean_cumulative_reward: f64,
    /// Mean episode length in steps.
    pub mean_steps: f64,
    /// Mean Manhattan distance between pursuer and target at episode end.
    pub mean_final_distance: f64,
    /// Number of episodes evaluated.
    pub n_episodes: usize,
}

#[derive(Debug)]
struct EpisodeStats {
    termination: Termination,
    steps: u32,
    cumulative_reward: f64,
    final_distance: i32,
}

impl EvaluationMetrics {
    /// Evaluates a policy over multiple episodes and returns aggregated metrics.
    ///
    /// The policy is never sent [`Policy::observe`], so learning policies are
    /// measured as they stand.
    pub fn evaluate(env: &mut PursuitEnvironment, policy: &mut dyn Policy, n_episodes: usize) -> Self {
        let mut all_stats = Vec::with_capacity(n_episodes);

        for _ in 0..n_episodes {
            let mut state = env.reset();
            let termination = loop {
                let action = policy.choose_action(&state);
                let result = env.step(action);
                state = env.state.key();
                if let Some(termination) = result.termination {
                    break termination;
                }
            };
            all_stats.push(EpisodeStats {
                termination,
                steps: env.t,
                cumulative_reward: env.cumulative_reward,
                final_distance: env.state.pursuer.manhattan_distance(&env.state.target),
            });
        }

        let n = all_stats.len().max(1) as f64;
        let rate = |t: Termination| {
            all_stats.iter().filter(|s| s.termination == t).count() as f64 / n
        };
        let mean = |f: fn(&EpisodeStats) -> f64| all_stats.iter().map(f).sum::<f64>() / n;

        Self {
            capture_rate: rate(Termination::Captured),
            abort_rate: rate(Termination::RewardThreshold),
            mean_cumulative_reward: mean(|s| s.cumulative_reward),
            mean_steps: mean(|s| f64::from(s.steps)),
            mean_final_distance: mean(|s| f64::from(s.final_distance)),
            n_episodes,
        }
    }
}

impl fmt::Display for EvaluationMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "=== Evaluation Metrics ({} episodes) ===",
            self.n_episodes
        )?;
        writeln!(f, "  Capture rate:            {:.1}%", self.capture_rate * 100.0)?;
        writeln!(f, "  Abort rate:              {:.1}%", self.abort_rate * 100.0)?;
        writeln!(f, "  Mean steps:              {:.1}", self.mean_steps)?;
        writeln!(f, "  Mean final distance:     {:.1}", self.mean_final_distance)?;
        writeln!(
            f,
            "  Mean cumulative reward:  {:.2}",
            self.mean_cumulative_reward
        )
    }
}
