//! Deep Q-learning for the blackjack engine in `blackjack_core`.
//!
//! This crate provides:
//! - the training environment wrapping a [`blackjack_core::Game`]
//! - a bounded replay buffer with uniform sampling
//! - masked epsilon-greedy action selection
//! - the [`Trainer`]: replay, online/target models, epsilon schedule
//! - the [`QValueModel`] seam a network backend implements
//!
//! # Example
//!
//! ```no_run
//! use blackjack_core::ActionRegistry;
//! use blackjack_dqn::{BlackjackEnv, DqnConfig, QValueModel, StdoutSink, Trainer};
//!
//! fn train<M: QValueModel>(online: M, target: M) -> blackjack_dqn::Result<()> {
//!     let config = DqnConfig::default().with_episodes(1_000);
//!     let mut env = BlackjackEnv::new(ActionRegistry::new(), config.penalty, config.seed);
//!     let save_path = config.save_path.clone();
//!
//!     let mut trainer = Trainer::new(config, online, target)?;
//!     let report = trainer.run(&mut env, &mut StdoutSink)?;
//!     println!("avg reward for last 100 episodes: {}", report.running_avg);
//!     trainer.save(&save_path)
//! }
//! ```

mod config;
mod env;
mod error;
pub mod exploration;
mod model;
mod policy;
mod replay;
mod telemetry;
mod trainer;

// Re-export public API
pub use config::{ConfigError, DqnConfig, ModelConfig};
pub use env::{BlackjackEnv, Step};
pub use error::{DqnError, Result};
pub use exploration::select_action;
pub use model::{max_value, predict_one, QValueModel};
pub use policy::GreedyPolicy;
pub use replay::{ReplayBuffer, Transition};
pub use telemetry::{
    EpisodeStats, FileSink, NoopSink, RecordingSink, StdoutSink, TrainingSink,
};
pub use trainer::{EpisodeOutcome, Trainer, TrainingReport};
