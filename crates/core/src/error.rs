use thiserror::Error;

use crate::action::ActionKind;
use crate::phase::Phase;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Game not initialized")]
    NotInitialized,

    #[error("Illegal action {action} in phase {phase:?} (score {score})")]
    IllegalAction {
        action: ActionKind,
        phase: Phase,
        score: u32,
    },

    #[error("Action {0} was already executed")]
    DoubleExecution(ActionKind),

    #[error("Invalid card: rank {rank}, suit {suit}")]
    InvalidCard { rank: u8, suit: u8 },

    #[error("Cannot deal from an empty deck")]
    EmptyDeck,

    #[error("Unknown action index: {0}")]
    UnknownAction(usize),

    #[error("No policy installed for the agent")]
    NoPolicy,

    #[error("Policy failed: {0}")]
    PolicyFailed(String),
}

pub type Result<T> = std::result::Result<T, GameError>;
