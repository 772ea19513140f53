use std::fmt;

use crate::card::{Card, Hand};

/// Highest score that does not break the player; reaching it exactly ends the turn
pub const TARGET_SCORE: u32 = 21;

/// Per-episode player state. `broken` and `stopped` only ever flip to true
/// until the next [`Player::reset`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Player {
    hand: Hand,
    broken: bool,
    stopped: bool,
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn score(&self) -> u32 {
        self.hand.score()
    }

    pub fn is_broken(&self) -> bool {
        self.broken
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Add a card and update the flags for the new score
    pub(crate) fn receive(&mut self, card: Card) {
        self.hand.add(card);
        let score = self.score();
        if score == TARGET_SCORE {
            self.stopped = true;
        } else if score > TARGET_SCORE {
            self.broken = true;
        }
    }

    pub(crate) fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn reset(&mut self) {
        self.hand = Hand::new();
        self.broken = false;
        self.stopped = false;
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let broken = if self.broken { " - broken" } else { "" };
        let stopped = if self.stopped { " - stopped" } else { "" };
        write!(f, "Player - {}{}{}\n{}", self.score(), broken, stopped, self.hand)
    }
}
