#![allow(dead_code)]

use std::path::Path;

use blackjack_dqn::{DqnError, QValueModel, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Q(s)[a] = w[a] . s + b[a], trained with plain gradient descent
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    pub weights: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
    pub lr: f32,
}

impl LinearModel {
    pub fn new(state_size: usize, num_actions: usize, lr: f32, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let weights = (0..num_actions)
            .map(|_| (0..state_size).map(|_| rng.gen_range(-0.01..0.01)).collect())
            .collect();
        let bias = (0..num_actions).map(|_| rng.gen_range(-0.01..0.01)).collect();
        Self { weights, bias, lr }
    }

    fn values(&self, state: &[f32]) -> Vec<f32> {
        self.weights
            .iter()
            .zip(&self.bias)
            .map(|(w, b)| w.iter().zip(state).map(|(w, s)| w * s).sum::<f32>() + b)
            .collect()
    }
}

impl QValueModel for LinearModel {
    fn state_size(&self) -> usize {
        self.weights[0].len()
    }

    fn num_actions(&self) -> usize {
        self.weights.len()
    }

    fn predict(&self, states: &[&[f32]]) -> Result<Vec<Vec<f32>>> {
        states
            .iter()
            .map(|s| {
                if s.len() != self.state_size() {
                    return Err(DqnError::Model(format!("bad state width {}", s.len())));
                }
                Ok(self.values(s))
            })
            .collect()
    }

    fn train_step(&mut self, states: &[&[f32]], actions: &[usize], targets: &[f32]) -> Result<f32> {
        let mut grad_w = vec![vec![0.0f32; self.state_size()]; self.num_actions()];
        let mut grad_b = vec![0.0f32; self.num_actions()];
        let mut loss = 0.0;

        for ((state, &action), &target) in states.iter().zip(actions).zip(targets) {
            let error = self.values(state)[action] - target;
            loss += error * error;
            for (g, s) in grad_w[action].iter_mut().zip(state.iter()) {
                *g += 2.0 * error * s;
            }
            grad_b[action] += 2.0 * error;
        }

        for (w_row, g_row) in self.weights.iter_mut().zip(&grad_w) {
            for (w, g) in w_row.iter_mut().zip(g_row) {
                *w -= self.lr * g;
            }
        }
        for (b, g) in self.bias.iter_mut().zip(&grad_b) {
            *b -= self.lr * g;
        }
        Ok(loss)
    }

    fn copy_parameters_from(&mut self, other: &Self) -> Result<()> {
        self.weights = other.weights.clone();
        self.bias = other.bias.clone();
        Ok(())
    }

    fn save(&self, path: &Path) -> Result<()> {
        let text = format!("{:?}\n{:?}\n", self.weights, self.bias);
        std::fs::write(path, text).map_err(|e| DqnError::Model(e.to_string()))
    }
}

/// Constant predictions; remembers what it was trained on
#[derive(Debug, Clone, Default)]
pub struct ConstModel {
    pub values: Vec<f32>,
    pub state_size: usize,
    pub trained_actions: Vec<Vec<usize>>,
    pub trained_targets: Vec<Vec<f32>>,
}

impl ConstModel {
    pub fn new(values: Vec<f32>, state_size: usize) -> Self {
        Self {
            values,
            state_size,
            ..Self::default()
        }
    }
}

impl QValueModel for ConstModel {
    fn state_size(&self) -> usize {
        self.state_size
    }

    fn num_actions(&self) -> usize {
        self.values.len()
    }

    fn predict(&self, states: &[&[f32]]) -> Result<Vec<Vec<f32>>> {
        Ok(states.iter().map(|_| self.values.clone()).collect())
    }

    fn train_step(&mut self, _states: &[&[f32]], actions: &[usize], targets: &[f32]) -> Result<f32> {
        self.trained_actions.push(actions.to_vec());
        self.trained_targets.push(targets.to_vec());
        Ok(0.0)
    }

    fn copy_parameters_from(&mut self, other: &Self) -> Result<()> {
        self.values = other.values.clone();
        Ok(())
    }

    fn save(&self, _path: &Path) -> Result<()> {
        Ok(())
    }
}
