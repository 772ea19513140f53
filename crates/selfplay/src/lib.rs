//! Playing complete blackjack games with an installed policy.
//!
//! This crate provides:
//! - playing a game to the end and recording the actions taken
//! - playing many games with the same agent
//! - evaluation reports: bust rate and mean score of non-bust games
//!
//! # Example
//!
//! ```no_run
//! use blackjack_core::{ActionRegistry, Game, RandomPolicy};
//! use blackjack_selfplay::{evaluate, play_game};
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut game = Game::new(ActionRegistry::new(), 42);
//! game.set_policy(Box::new(RandomPolicy::new(42)));
//!
//! let record = play_game(&mut game, true)?;
//! println!("final score {}, won: {}", record.final_score, record.won);
//!
//! let report = evaluate(&mut game, 100)?;
//! println!("Break Percent: {:.0}%", report.bust_percent);
//! # Ok(())
//! # }
//! ```

mod data;
mod game;

// Re-export public API
pub use data::{EvaluationReport, GameRecord};
pub use game::{evaluate, play_game, play_games};
