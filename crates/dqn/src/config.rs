use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Value network architecture
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Width of each hidden layer, input side first
    pub hidden_units: Vec<i64>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            hidden_units: vec![64, 64],
        }
    }
}

/// Configuration for DQN training.
///
/// Missing keys in a YAML file fall back to [`DqnConfig::default`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DqnConfig {
    /// Discount factor for bootstrapped targets
    pub gamma: f32,

    /// Replay buffer capacity
    pub max_experiences: usize,

    /// Experiences required before gradient updates start
    pub min_experiences: usize,

    /// Transitions sampled per gradient update
    pub batch_size: usize,

    /// Adam learning rate
    pub learning_rate: f64,

    /// Number of training episodes
    pub episodes: u32,

    /// Environment steps between target network syncs
    pub copy_step: u64,

    /// Environment steps between experience replay dumps (0 disables them)
    pub print_exp_step: u64,

    /// Initial exploration rate
    pub epsilon: f32,

    /// Exploration floor
    pub min_epsilon: f32,

    /// Multiplicative epsilon decay applied after each episode
    pub decay: f32,

    /// Added to the reward of a Stand taken below the target score
    pub penalty: f32,

    /// Episodes between summary lines
    pub summary_every: u32,

    /// Seed for exploration, replay sampling and deck shuffling
    pub seed: u64,

    /// Where the trained online network is written
    pub save_path: PathBuf,

    /// Directory for per-episode training metrics
    pub log_dir: PathBuf,

    pub model: ModelConfig,
}

impl DqnConfig {
    /// Load from a YAML file and validate
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject settings the trainer cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.max_experiences == 0 {
            return invalid("max_experiences must be > 0".into());
        }
        if self.min_experiences > self.max_experiences {
            return invalid(format!(
                "min_experiences ({}) exceeds max_experiences ({})",
                self.min_experiences, self.max_experiences
            ));
        }
        if self.batch_size == 0 {
            return invalid("batch_size must be > 0".into());
        }
        if self.copy_step == 0 {
            return invalid("copy_step must be > 0".into());
        }
        if !(0.0..=1.0).contains(&self.gamma) {
            return invalid(format!("gamma must be in [0, 1], got {}", self.gamma));
        }
        if !(0.0..=1.0).contains(&self.epsilon) || !(0.0..=1.0).contains(&self.min_epsilon) {
            return invalid(format!(
                "epsilon ({}) and min_epsilon ({}) must be in [0, 1]",
                self.epsilon, self.min_epsilon
            ));
        }
        if !(0.0..=1.0).contains(&self.decay) {
            return invalid(format!("decay must be in [0, 1], got {}", self.decay));
        }
        if self.learning_rate <= 0.0 {
            return invalid(format!("learning_rate must be > 0, got {}", self.learning_rate));
        }
        if self.model.hidden_units.iter().any(|&h| h <= 0) {
            return invalid("hidden layer sizes must be > 0".into());
        }
        Ok(())
    }

    pub fn with_gamma(mut self, gamma: f32) -> Self {
        self.gamma = gamma;
        self
    }

    /// Set replay capacity and warm-up size
    pub fn with_replay(mut self, max_experiences: usize, min_experiences: usize) -> Self {
        self.max_experiences = max_experiences.max(1);
        self.min_experiences = min_experiences;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_learning_rate(mut self, lr: f64) -> Self {
        self.learning_rate = lr;
        self
    }

    pub fn with_episodes(mut self, episodes: u32) -> Self {
        self.episodes = episodes;
        self
    }

    pub fn with_copy_step(mut self, copy_step: u64) -> Self {
        self.copy_step = copy_step.max(1);
        self
    }

    pub fn with_print_exp_step(mut self, steps: u64) -> Self {
        self.print_exp_step = steps;
        self
    }

    /// Set the exploration schedule
    pub fn with_epsilon(mut self, epsilon: f32, min_epsilon: f32, decay: f32) -> Self {
        self.epsilon = epsilon;
        self.min_epsilon = min_epsilon;
        self.decay = decay;
        self
    }

    pub fn with_penalty(mut self, penalty: f32) -> Self {
        self.penalty = penalty;
        self
    }

    pub fn with_summary_every(mut self, episodes: u32) -> Self {
        self.summary_every = episodes.max(1);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_save_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.save_path = path.into();
        self
    }

    pub fn with_log_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.log_dir = dir.into();
        self
    }

    /// JSONL file the per-episode metrics of a run are written to
    pub fn episode_log_path(&self) -> PathBuf {
        self.log_dir.join("episodes.jsonl")
    }

    pub fn with_hidden_units(mut self, hidden_units: Vec<i64>) -> Self {
        self.model.hidden_units = hidden_units;
        self
    }
}

impl Default for DqnConfig {
    fn default() -> Self {
        Self {
            gamma: 0.99,
            max_experiences: 10_000,
            min_experiences: 100,
            batch_size: 32,
            learning_rate: 1e-3,
            episodes: 5_000,
            copy_step: 25,
            print_exp_step: 0,
            epsilon: 0.99,
            min_epsilon: 0.1,
            decay: 0.9999,
            penalty: 0.0,
            summary_every: 100,
            seed: 0,
            save_path: PathBuf::from("models/blackjack_dqn.ot"),
            log_dir: PathBuf::from("logs"),
            model: ModelConfig::default(),
        }
    }
}
