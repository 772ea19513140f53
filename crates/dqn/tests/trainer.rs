mod common;

use approx::assert_relative_eq;
use blackjack_core::{ActionKind, ActionRegistry, Card, Deck, Game, STATE_SIZE};
use blackjack_dqn::{
    BlackjackEnv, DqnConfig, DqnError, EpisodeStats, FileSink, NoopSink, QValueModel,
    RecordingSink, Trainer,
};
use common::{ConstModel, LinearModel};

fn linear_pair(lr: f32) -> (LinearModel, LinearModel) {
    (
        LinearModel::new(STATE_SIZE, 2, lr, 1),
        LinearModel::new(STATE_SIZE, 2, lr, 2),
    )
}

fn env(penalty: f32, seed: u64) -> BlackjackEnv {
    BlackjackEnv::new(ActionRegistry::new(), penalty, seed)
}

fn env_with_ranks(ranks: &[u8]) -> BlackjackEnv {
    let mut game = Game::new(ActionRegistry::new(), 0);
    let cards = ranks.iter().map(|&r| Card::new(r, 0)).collect();
    game.initialize_with_deck(Deck::from_cards(cards));
    BlackjackEnv::from_game(game, 0.0)
}

#[test]
fn target_matches_online_right_after_sync() {
    let config = DqnConfig::default()
        .with_replay(1_000, 1)
        .with_batch_size(4)
        .with_copy_step(7)
        .with_epsilon(1.0, 1.0, 1.0);
    let (online, target) = linear_pair(0.01);
    let initial_target = target.clone();
    let mut trainer = Trainer::new(config, online, target).unwrap();
    let mut env = env(0.0, 11);
    let mut sink = RecordingSink::default();

    for _ in 0..6 {
        if env.is_done() {
            env.reset().unwrap();
        }
        trainer.step(&mut env, &mut sink).unwrap();
    }
    assert_eq!(trainer.target(), &initial_target);
    assert!(sink.syncs.is_empty());

    if env.is_done() {
        env.reset().unwrap();
    }
    trainer.step(&mut env, &mut sink).unwrap();
    assert_eq!(sink.syncs, vec![7]);
    assert_eq!(trainer.online(), trainer.target());

    // Parameters are copied, not shared
    assert!(trainer.train_step().unwrap().is_some());
    assert_ne!(trainer.online(), trainer.target());
}

#[test]
fn syncs_follow_global_step_count() {
    let config = DqnConfig::default()
        .with_replay(1_000, 1)
        .with_copy_step(5)
        .with_episodes(30)
        .with_epsilon(1.0, 1.0, 1.0);
    let (online, target) = linear_pair(0.001);
    let mut trainer = Trainer::new(config, online, target).unwrap();
    let mut sink = RecordingSink::default();

    let report = trainer.run(&mut env(0.0, 3), &mut sink).unwrap();
    let expected: Vec<u64> = (1..=report.total_steps / 5).map(|k| k * 5).collect();
    assert_eq!(sink.syncs, expected);
}

#[test]
fn no_training_before_min_experiences() {
    let config = DqnConfig::default()
        .with_replay(100, 50)
        .with_epsilon(1.0, 1.0, 1.0);
    let (online, target) = linear_pair(0.01);
    let initial_online = online.clone();
    let mut trainer = Trainer::new(config, online, target).unwrap();
    assert_eq!(trainer.train_step().unwrap(), None);

    let mut env = env(0.0, 4);
    for _ in 0..10 {
        if env.is_done() {
            env.reset().unwrap();
        }
        trainer.step(&mut env, &mut NoopSink).unwrap();
    }
    assert_eq!(trainer.buffer().len(), 10);
    assert_eq!(trainer.online(), &initial_online);
    assert_eq!(trainer.train_step().unwrap(), None);
}

#[test]
fn non_terminal_target_bootstraps_from_target_model() {
    let config = DqnConfig::default()
        .with_replay(1, 1)
        .with_batch_size(1)
        .with_gamma(0.5)
        .with_epsilon(0.0, 0.0, 1.0);
    let online = ConstModel::new(vec![5.0, 2.0], STATE_SIZE);
    let target = ConstModel::new(vec![3.0, 7.0], STATE_SIZE);
    let mut trainer = Trainer::new(config, online, target).unwrap();
    let mut env = env_with_ranks(&[4, 5, 6]);

    let step = trainer.step(&mut env, &mut NoopSink).unwrap();
    assert_eq!(step.action, ActionKind::Draw);
    assert!(!step.done);

    let online = trainer.online();
    assert_eq!(online.trained_actions, vec![vec![0]]);
    assert_eq!(online.trained_targets.len(), 1);
    assert_relative_eq!(online.trained_targets[0][0], 0.5 * 7.0);
}

#[test]
fn terminal_target_is_the_reward() {
    let config = DqnConfig::default()
        .with_replay(1, 1)
        .with_batch_size(1)
        .with_epsilon(0.0, 0.0, 1.0);
    let online = ConstModel::new(vec![2.0, 5.0], STATE_SIZE);
    let target = ConstModel::new(vec![100.0, 100.0], STATE_SIZE);
    let mut trainer = Trainer::new(config, online, target).unwrap();
    let mut env = env_with_ranks(&[4, 5, 6]);

    let step = trainer.step(&mut env, &mut NoopSink).unwrap();
    assert_eq!(step.action, ActionKind::Stand);
    assert!(step.done);
    assert_eq!(trainer.online().trained_actions, vec![vec![1]]);
    assert_relative_eq!(trainer.online().trained_targets[0][0], 1.0);
}

#[test]
fn epsilon_decays_once_per_episode() {
    let config = DqnConfig::default()
        .with_episodes(3)
        .with_epsilon(0.9, 0.05, 0.5);
    let (online, target) = linear_pair(0.001);
    let mut trainer = Trainer::new(config, online, target).unwrap();
    let mut sink = RecordingSink::default();

    let report = trainer.run(&mut env(0.0, 9), &mut sink).unwrap();
    let played_with: Vec<f32> = sink.episodes.iter().map(|s| s.epsilon).collect();
    assert_eq!(played_with.len(), 3);
    assert_relative_eq!(played_with[0], 0.9);
    assert_relative_eq!(played_with[1], 0.45);
    assert_relative_eq!(played_with[2], 0.225);
    assert_relative_eq!(report.final_epsilon, 0.1125);
}

#[test]
fn epsilon_never_drops_below_minimum() {
    let config = DqnConfig::default()
        .with_episodes(12)
        .with_epsilon(0.9, 0.05, 0.5);
    let (online, target) = linear_pair(0.001);
    let mut trainer = Trainer::new(config, online, target).unwrap();

    let report = trainer.run(&mut env(0.0, 10), &mut NoopSink).unwrap();
    assert_relative_eq!(report.final_epsilon, 0.05);
    assert_relative_eq!(trainer.epsilon(), 0.05);
}

#[test]
fn replay_buffer_stays_bounded() {
    let config = DqnConfig::default()
        .with_replay(8, 2)
        .with_episodes(50)
        .with_epsilon(1.0, 1.0, 1.0);
    let (online, target) = linear_pair(0.001);
    let mut trainer = Trainer::new(config, online, target).unwrap();

    let report = trainer.run(&mut env(0.0, 12), &mut NoopSink).unwrap();
    assert!(report.total_steps >= 50);
    assert_eq!(trainer.buffer().len(), 8);
}

#[test]
fn experience_replay_dumps_at_fixed_step_interval() {
    let config = DqnConfig::default()
        .with_replay(1_000, 10)
        .with_print_exp_step(3)
        .with_episodes(20)
        .with_epsilon(1.0, 1.0, 1.0);
    let (online, target) = linear_pair(0.001);
    let mut trainer = Trainer::new(config, online, target).unwrap();
    let mut sink = RecordingSink::default();

    let report = trainer.run(&mut env(0.0, 13), &mut sink).unwrap();
    assert_eq!(sink.replays.len() as u64, report.total_steps / 3);
    for (step, actions) in &sink.replays {
        assert_eq!(step % 3, 0);
        assert_eq!(actions.len() as u64, *step);
    }
}

#[test]
fn summaries_every_n_episodes() {
    let config = DqnConfig::default()
        .with_episodes(10)
        .with_summary_every(4);
    let (online, target) = linear_pair(0.001);
    let mut trainer = Trainer::new(config, online, target).unwrap();
    let mut sink = RecordingSink::default();

    trainer.run(&mut env(0.0, 14), &mut sink).unwrap();
    assert_eq!(sink.episodes.len(), 10);
    let summarized: Vec<u32> = sink.summaries.iter().map(|s| s.episode).collect();
    assert_eq!(summarized, vec![0, 4, 8]);
}

#[test]
fn stand_penalty_shows_in_running_average() {
    let config = DqnConfig::default()
        .with_episodes(5)
        .with_epsilon(0.0, 0.0, 1.0);
    let online = ConstModel::new(vec![0.0, 1.0], STATE_SIZE);
    let target = online.clone();
    let mut trainer = Trainer::new(config, online, target).unwrap();

    let report = trainer.run(&mut env(-3.0, 15), &mut NoopSink).unwrap();
    assert_eq!(report.episodes, 5);
    assert_eq!(report.total_steps, 5);
    assert!(report.rewards.iter().all(|&r| r == -2.0));
    assert_relative_eq!(report.running_avg, -2.0);
}

#[test]
fn rejects_mismatched_models_and_bad_config() {
    let online = LinearModel::new(STATE_SIZE, 2, 0.01, 1);
    let wide = LinearModel::new(STATE_SIZE, 3, 0.01, 2);
    assert!(matches!(
        Trainer::new(DqnConfig::default(), online.clone(), wide),
        Err(DqnError::OutputWidth { expected: 2, actual: 3 })
    ));

    let bad = DqnConfig::default().with_replay(10, 20);
    assert!(matches!(
        Trainer::new(bad, online.clone(), online),
        Err(DqnError::Config(_))
    ));
}

#[test]
fn save_writes_online_model() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.txt");
    let (online, target) = linear_pair(0.01);
    let trainer = Trainer::new(DqnConfig::default(), online, target).unwrap();

    trainer.save(&path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(!text.is_empty());
    assert_eq!(trainer.online().num_actions(), 2);
}

#[test]
fn episode_metrics_are_written_as_jsonl() {
    let dir = tempfile::tempdir().unwrap();
    let config = DqnConfig::default()
        .with_episodes(6)
        .with_epsilon(0.0, 0.0, 1.0)
        .with_log_dir(dir.path().join("logs"));
    let online = ConstModel::new(vec![0.0, 1.0], STATE_SIZE);
    let target = online.clone();
    let log_path = config.episode_log_path();
    let mut trainer = Trainer::new(config, online, target).unwrap();

    let mut sinks = (RecordingSink::default(), FileSink::create(&log_path).unwrap());
    let report = trainer.run(&mut env(-3.0, 16), &mut sinks).unwrap();
    drop(sinks.1);

    let text = std::fs::read_to_string(&log_path).unwrap();
    let written: Vec<EpisodeStats> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(written, sinks.0.episodes);
    assert_eq!(written.len(), 6);
    assert!(written.iter().all(|s| s.total_reward == -2.0));
    assert_relative_eq!(written[5].running_avg, report.running_avg);
}
