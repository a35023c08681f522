//! Offline trainer for the pursuit Q-table.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use pursuit::algorithms::rl::{
    EvaluationMetrics, GreedyChasePolicy, Policy, PursuitEnvironment, QPolicy, RandomPolicy,
    Trainer,
};
use pursuit::persistence::{load_or_empty, JsonFileStore};
use pursuit::PursuitConfig;

#[derive(Debug, Parser)]
#[command(name = "pursuit_train", about = "Train the pursuer's Q-table offline")]
struct Args {
    /// Number of training episodes.
    #[arg(long)]
    episodes: Option<u32>,

    /// Tick cap per episode.
    #[arg(long)]
    max_steps: Option<u32>,

    /// Base RNG seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Q-table file, loaded on start and rewritten after every episode.
    #[arg(long, default_value = "qtable.json")]
    table: PathBuf,

    /// JSON configuration overrides.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Exploration rate during training.
    #[arg(long)]
    epsilon: Option<f64>,

    /// After training, evaluate the greedy table and both baselines over N episodes.
    #[arg(long, value_name = "N", default_value_t = 0)]
    evaluate: usize,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = build_config(&args)?;

    let store = JsonFileStore::new(&args.table);
    let table = load_or_empty(&store);
    info!(
        table = %args.table.display(),
        entries = table.len(),
        episodes = config.training.episodes,
        "starting training"
    );

    let mut trainer = Trainer::new(&config, table).with_store(Box::new(store));
    let summary = trainer.run(config.training.episodes);
    println!("{summary}");

    if args.evaluate > 0 {
        evaluate(&config, trainer.into_policy(), args.evaluate);
    }
    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn build_config(args: &Args) -> Result<PursuitConfig> {
    let mut config = match &args.config {
        Some(path) => PursuitConfig::from_json_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => PursuitConfig::default(),
    };
    if let Some(episodes) = args.episodes {
        config.training.episodes = episodes;
    }
    if let Some(max_steps) = args.max_steps {
        config.training.max_steps = max_steps;
    }
    if let Some(seed) = args.seed {
        config.training.seed = seed;
    }
    if let Some(epsilon) = args.epsilon {
        config.q_learning.epsilon = epsilon;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn evaluate(config: &PursuitConfig, mut learned: QPolicy, episodes: usize) {
    learned.set_epsilon(0.0);
    let seed = config.training.seed.wrapping_add(10_000);
    if learned.table().is_empty() {
        warn!("q-table is empty, learned policy will act randomly");
    }

    let mut greedy = GreedyChasePolicy::new(config.grid);
    let mut random = RandomPolicy::new(seed);
    let policies: [&mut dyn Policy; 3] = [&mut learned, &mut greedy, &mut random];
    for policy in policies {
        let name = policy.name().to_string();
        let mut env = PursuitEnvironment::new(config, seed);
        let metrics = EvaluationMetrics::evaluate(&mut env, policy, episodes);
        println!("[{name}]\n{metrics}");
    }
}
