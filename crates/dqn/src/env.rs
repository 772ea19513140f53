use blackjack_core::{ActionKind, ActionRegistry, Game, STATE_SIZE, TARGET_SCORE};

use crate::error::{DqnError, Result};

/// Outcome of one environment step
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub state: Vec<f32>,
    pub reward: f32,
    pub done: bool,
    pub action: ActionKind,
}

/// Training view of a [`Game`]: integer actions in, encoded states and
/// rewards out.
pub struct BlackjackEnv {
    game: Game,
    penalty: f32,
}

impl BlackjackEnv {
    /// `penalty` is added to the reward of a Stand taken below the target score
    pub fn new(registry: ActionRegistry, penalty: f32, seed: u64) -> Self {
        let mut game = Game::new(registry, seed);
        game.initialize();
        Self { game, penalty }
    }

    /// Wrap an existing game; it is initialized if needed
    pub fn from_game(mut game: Game, penalty: f32) -> Self {
        game.initialize();
        Self { game, penalty }
    }

    /// Start a new episode with a fresh deck and return its first state
    pub fn reset(&mut self) -> Result<Vec<f32>> {
        self.game.reset(true);
        self.observation()
    }

    pub fn observation(&self) -> Result<Vec<f32>> {
        Ok(self.game.observation()?)
    }

    pub fn legality_mask(&self) -> Result<Vec<bool>> {
        Ok(self.game.legality_mask()?)
    }

    pub fn is_done(&self) -> bool {
        self.game.is_terminal()
    }

    /// Apply the action at `index` of the registry
    pub fn step(&mut self, index: usize) -> Result<Step> {
        let score_before = self
            .game
            .player()
            .map(|p| p.score())
            .ok_or(DqnError::Game(blackjack_core::GameError::NotInitialized))?;

        let action = self.game.apply_index(index)?;
        let mut reward = action.reward();
        if action.key() == ActionKind::Stand && score_before < TARGET_SCORE {
            reward += self.penalty;
        }

        Ok(Step {
            state: self.observation()?,
            reward,
            done: self.game.is_terminal(),
            action: action.key(),
        })
    }

    pub fn penalty(&self) -> f32 {
        self.penalty
    }

    pub fn registry(&self) -> &ActionRegistry {
        self.game.registry()
    }

    pub fn num_actions(&self) -> usize {
        self.game.registry().len()
    }

    pub fn state_size(&self) -> usize {
        STATE_SIZE
    }

    pub fn game(&self) -> &Game {
        &self.game
    }
}
