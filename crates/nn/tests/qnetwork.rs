use approx::assert_relative_eq;
use blackjack_core::{ActionRegistry, Game, STATE_SIZE};
use blackjack_dqn::{predict_one, GreedyPolicy, ModelConfig, QValueModel};
use blackjack_nn::QNetwork;
use tch::Device;

fn network(seed: i64) -> QNetwork {
    tch::manual_seed(seed);
    let model = ModelConfig {
        hidden_units: vec![16],
    };
    QNetwork::new(STATE_SIZE, 2, &model, 1e-2, Device::Cpu).unwrap()
}

fn state(score: f32) -> Vec<f32> {
    let mut s = vec![0.0; STATE_SIZE];
    s[STATE_SIZE - 1] = score;
    s
}

#[test]
fn predict_returns_one_row_per_state() {
    let net = network(0);
    let a = state(3.0);
    let b = state(17.0);
    let rows = net.predict(&[a.as_slice(), b.as_slice()]).unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.len() == 2));
    let empty: [&[f32]; 0] = [];
    assert!(net.predict(&empty).unwrap().is_empty());
}

#[test]
fn predict_rejects_wrong_width() {
    let net = network(0);
    let short = vec![0.0; 3];
    assert!(net.predict(&[short.as_slice()]).is_err());
}

#[test]
fn repeated_training_reduces_loss() {
    let mut net = network(1);
    let s = state(0.5);
    let states = [s.as_slice(), s.as_slice()];
    let actions = [0, 1];
    let targets = [1.0, -1.0];

    let first = net.train_step(&states, &actions, &targets).unwrap();
    let mut last = first;
    for _ in 0..200 {
        last = net.train_step(&states, &actions, &targets).unwrap();
    }
    assert!(last < first);
    assert!(last < 0.2);

    let values = predict_one(&net, &s).unwrap();
    assert_relative_eq!(values[0], 1.0, epsilon = 0.5);
    assert_relative_eq!(values[1], -1.0, epsilon = 0.5);
}

#[test]
fn copied_parameters_are_independent() {
    let mut online = network(2);
    let mut target = network(3);
    let s = state(10.0);
    assert_ne!(predict_one(&online, &s).unwrap(), predict_one(&target, &s).unwrap());

    target.copy_parameters_from(&online).unwrap();
    assert_eq!(predict_one(&online, &s).unwrap(), predict_one(&target, &s).unwrap());

    let before = predict_one(&target, &s).unwrap();
    online.train_step(&[s.as_slice()], &[0], &[50.0]).unwrap();
    assert_eq!(predict_one(&target, &s).unwrap(), before);
    assert_ne!(predict_one(&online, &s).unwrap(), before);
}

#[test]
fn save_then_load_restores_predictions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("q.ot");
    let net = network(4);
    let s = state(12.0);
    net.save(&path).unwrap();

    let mut restored = network(5);
    restored.load_weights(&path).unwrap();
    assert_eq!(predict_one(&restored, &s).unwrap(), predict_one(&net, &s).unwrap());
}

#[test]
fn greedy_policy_finishes_a_game() {
    let mut game = Game::new(ActionRegistry::new(), 6);
    game.initialize();
    game.set_policy(Box::new(GreedyPolicy::new(network(6))));

    let mut steps = 0;
    while !game.is_terminal() {
        game.play_single_step(false).unwrap();
        steps += 1;
        assert!(steps < 60);
    }
    assert!(game.player().unwrap().is_broken() || game.player().unwrap().is_stopped());
}
