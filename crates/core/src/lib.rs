//! Game engine for a single-player blackjack variant.
//!
//! The player draws cards trying to reach a score of exactly 21 without
//! going over, or stands. This crate provides:
//! - cards, deck and hand
//! - the action protocol (`Draw`, `Stand`) and the fixed action registry
//! - the turn state machine ([`Game`]) that applies actions and tracks phase
//! - the state encoder used as value-network input
//! - the [`Policy`] seam used to plug decision rules into a game

mod action;
mod card;
pub mod encoding;
mod error;
mod game;
mod phase;
mod player;
mod policy;
mod registry;

pub use action::{Action, ActionKind, Rejection};
pub use card::{Card, Deck, Hand, DECK_SIZE};
pub use encoding::STATE_SIZE;
pub use error::{GameError, Result};
pub use game::Game;
pub use phase::Phase;
pub use player::{Player, TARGET_SCORE};
pub use policy::{Observation, Policy, RandomPolicy};
pub use registry::ActionRegistry;
