//! End-to-end pursuit scenarios across prediction, reward, learning,
//! persistence and live play.

use pursuit::algorithms::rl::{
    LivePursuer, LiveStrategy, Policy, PursuitEnvironment, QLearningConfig, QPolicy, QTable,
    RewardComputer, RewardConfig, StateKey, Trainer,
};
use pursuit::grid::{Action, GridBounds, ObstacleSet, Position};
use pursuit::persistence::{load_or_empty, JsonFileStore, TableStore};
use pursuit::PursuitConfig;

fn greedy_config() -> QLearningConfig {
    QLearningConfig {
        epsilon: 0.0,
        ..QLearningConfig::default()
    }
}

#[test]
fn first_updates_prefer_the_diagonal_approach() {
    let config = PursuitConfig::default();
    let mut env = PursuitEnvironment::new(&config, 3);
    let mut policy = QPolicy::new(greedy_config(), 3);

    let start = Position::new(0, 0);
    let target = Position::new(50, 50);
    for action in Action::ALL {
        env.reset_to(start, target);
        let result = env.step(action);
        policy.observe(&result.transition);
    }

    let state = StateKey::new(start, target);
    let table = policy.table();
    let approach = table.value(&state, Action::DownRight);
    for away in [Action::Left, Action::Up, Action::UpLeft] {
        assert!(approach > table.value(&state, away), "{away} should score lower");
    }
    assert_eq!(table.best_action(&state), Action::DownRight);
    assert_eq!(policy.choose_action(&state), Action::DownRight);
}

#[test]
fn repeated_updates_converge() {
    let mut policy = QPolicy::new(greedy_config(), 1);
    let state = StateKey::new(Position::new(100, 100), Position::new(300, 300));
    let next = StateKey::new(Position::new(110, 110), Position::new(300, 300));

    let mut value = 0.0;
    for _ in 0..300 {
        value = policy.update(&state, Action::DownRight, 5.0, &next);
    }
    // next state is never updated, so its max stays 0
    assert!((value - 5.0).abs() < 1e-6);
}

#[test]
fn escape_paths_shrink_as_the_pursuer_closes_in() {
    let rc = RewardComputer::new(RewardConfig::default(), GridBounds::default());
    let target = Position::new(500, 500);
    let body = ObstacleSet::from_segments(&[Position::new(490, 500), Position::new(480, 500)]);

    let far = rc.count_escape_paths(target, Position::new(100, 100), &body);
    let near = rc.count_escape_paths(target, Position::new(510, 520), &body);
    assert_eq!(far, 7);
    assert!(near < far);
    assert!(rc.containment_term(near) > rc.containment_term(far));
}

#[test]
fn training_persists_and_resumes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("qtable.json");

    let mut config = PursuitConfig::default();
    config.grid.size = 300;
    config.training.max_steps = 60;

    let mut first = Trainer::new(&config, QTable::new()).with_store(Box::new(JsonFileStore::new(&path)));
    let summary = first.run(5);
    assert_eq!(summary.episodes, 5);
    let trained = first.into_policy().into_table();
    assert!(!trained.is_empty());

    let reloaded = load_or_empty(&JsonFileStore::new(&path));
    assert_eq!(reloaded, trained);

    config.training.seed += 1;
    let mut second = Trainer::new(&config, reloaded);
    second.run(2);
    assert!(second.policy().table().len() >= trained.len());
}

#[test]
fn config_file_drives_training() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pursuit.json");
    std::fs::write(
        &path,
        r#"{ "grid": { "size": 200 }, "training": { "max_steps": 15, "seed": 9 } }"#,
    )
    .unwrap();

    let config = PursuitConfig::from_json_file(&path).unwrap();
    let mut trainer = Trainer::new(&config, QTable::new());
    let report = trainer.run_episode();
    assert!(report.steps <= 15);
    assert!(trainer.environment().bounds().contains(trainer.environment().state.pursuer));
}

#[test]
fn chasing_pursuer_catches_a_stationary_target() {
    let config = PursuitConfig::default();
    let mut pursuer = LivePursuer::new(&config, LiveStrategy::Chase, Position::new(0, 0), 1);
    let head = Position::new(200, 120);

    let mut ticks = 0;
    while pursuer.position() != head {
        let outcome = pursuer.tick(&[head]);
        assert!(outcome.moved);
        ticks += 1;
        assert!(ticks <= 20, "pursuer failed to reach the target");
    }
}

#[test]
fn learned_pursuer_resumes_from_saved_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("live.json");
    let config = PursuitConfig::default();

    let mut store = JsonFileStore::new(&path);
    let mut seeded = QPolicy::new(greedy_config(), 0);
    let state = StateKey::new(Position::new(0, 0), Position::new(50, 50));
    seeded.update(&state, Action::DownRight, 50.0, &state);
    store.save(seeded.table()).unwrap();

    let mut pursuer = LivePursuer::new(&config, LiveStrategy::Learned, Position::new(0, 0), 4)
        .with_table(load_or_empty(&store))
        .with_store(Box::new(store));
    pursuer.policy_mut().set_epsilon(0.0);

    let outcome = pursuer.tick(&[Position::new(50, 50)]);
    assert_eq!(outcome.action, Some(Action::DownRight));
    assert_eq!(outcome.position, Position::new(10, 10));
    let saved = JsonFileStore::new(&path).load().unwrap();
    assert_eq!(&saved, pursuer.policy().table());
}
