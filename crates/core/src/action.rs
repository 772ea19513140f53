use std::fmt;
use std::hash::{Hash, Hasher};

use crate::card::Deck;
use crate::error::{GameError, Result};
use crate::phase::Phase;
use crate::player::{Player, TARGET_SCORE};

/// Discriminator key of an action. All actions are parameterless, so the
/// kind alone identifies an action for equality, hashing and indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Request one more card
    Draw,
    /// End the turn voluntarily
    Stand,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Draw => write!(f, "Draw"),
            ActionKind::Stand => write!(f, "Stand"),
        }
    }
}

/// Why an action is not applicable to a state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    WrongPhase(Phase),
    PlayerBroken,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::WrongPhase(phase) => write!(f, "wrong phase - {phase:?}"),
            Rejection::PlayerBroken => write!(f, "player is broken"),
        }
    }
}

/// A single move. Once [`Action::execute`] succeeds the action is marked
/// executed and can never be applied again.
#[derive(Debug, Clone)]
pub struct Action {
    kind: ActionKind,
    executed: bool,
}

impl Action {
    pub fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            executed: false,
        }
    }

    pub fn draw() -> Self {
        Self::new(ActionKind::Draw)
    }

    pub fn stand() -> Self {
        Self::new(ActionKind::Stand)
    }

    pub fn key(&self) -> ActionKind {
        self.kind
    }

    pub fn is_executed(&self) -> bool {
        self.executed
    }

    /// Reason this action cannot be applied, if any
    pub fn rejection(&self, player: &Player, phase: Phase) -> Option<Rejection> {
        if phase != Phase::PlayerTurn {
            return Some(Rejection::WrongPhase(phase));
        }
        if player.is_broken() {
            return Some(Rejection::PlayerBroken);
        }
        None
    }

    /// Legality predicate. Never fails; with `verbose` the reason for a
    /// rejection is written to stderr.
    pub fn validate(&self, player: &Player, phase: Phase, verbose: bool) -> bool {
        match self.rejection(player, phase) {
            Some(reason) => {
                if verbose {
                    eprintln!("Invalid action {self}. Reason: {reason}");
                }
                false
            }
            None => {
                // Drawing after stopping is allowed; only reported.
                if verbose && self.kind == ActionKind::Draw && player.is_stopped() {
                    eprintln!("Action {self} requested after the player has stopped");
                }
                true
            }
        }
    }

    /// Validate, apply and mark executed. Returns the phase the game moves to.
    pub fn execute(&mut self, player: &mut Player, deck: &mut Deck, phase: Phase) -> Result<Phase> {
        if self.executed {
            return Err(GameError::DoubleExecution(self.kind));
        }
        if !self.validate(player, phase, true) {
            return Err(GameError::IllegalAction {
                action: self.kind,
                phase,
                score: player.score(),
            });
        }
        self.apply(player, deck)?;
        self.executed = true;
        Ok(self.target_phase(player))
    }

    /// Training reward, read after execution
    pub fn reward(&self) -> f32 {
        match self.kind {
            ActionKind::Draw => 0.0,
            ActionKind::Stand => 1.0,
        }
    }

    fn apply(&self, player: &mut Player, deck: &mut Deck) -> Result<()> {
        match self.kind {
            ActionKind::Draw => {
                let card = deck.deal()?;
                player.receive(card);
            }
            ActionKind::Stand => player.stop(),
        }
        Ok(())
    }

    fn target_phase(&self, player: &Player) -> Phase {
        match self.kind {
            ActionKind::Draw => {
                if player.score() == TARGET_SCORE || player.is_broken() {
                    Phase::HouseTurn
                } else {
                    Phase::PlayerTurn
                }
            }
            ActionKind::Stand => Phase::HouseTurn,
        }
    }
}

impl PartialEq for Action {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Action {}

impl Hash for Action {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.executed {
            write!(f, "(E) ")?;
        }
        write!(f, "{}", self.kind)
    }
}
