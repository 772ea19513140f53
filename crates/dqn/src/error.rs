use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum DqnError {
    #[error("Game error: {0}")]
    Game(#[from] blackjack_core::GameError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Not enough experiences to sample: have {have}, need {need}")]
    InsufficientData { have: usize, need: usize },

    #[error("No legal actions available")]
    NoLegalActions,

    #[error("Value model error: {0}")]
    Model(String),

    #[error("Expected {expected} action values, got {actual}")]
    OutputWidth { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, DqnError>;
