use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::action::Action;
use crate::card::Deck;
use crate::encoding;
use crate::error::{GameError, Result};
use crate::phase::Phase;
use crate::player::{Player, TARGET_SCORE};
use crate::policy::{Observation, Policy};
use crate::registry::ActionRegistry;

/// Turn state machine for a single player against the house.
///
/// The game is initialized when a phase, a deck and a player are present.
/// Phase changes only happen through [`Game::apply_action`], driven by the
/// target phase of the action just executed.
pub struct Game {
    registry: ActionRegistry,
    phase: Option<Phase>,
    deck: Option<Deck>,
    player: Option<Player>,
    policy: Option<Box<dyn Policy>>,
    rng: StdRng,
}

impl Game {
    /// Create an uninitialized game. `seed` drives deck shuffling.
    pub fn new(registry: ActionRegistry, seed: u64) -> Self {
        Self {
            registry,
            phase: None,
            deck: None,
            player: None,
            policy: None,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Set up phase, player and a freshly shuffled deck. No-op when already
    /// initialized.
    pub fn initialize(&mut self) {
        if self.is_initialized() {
            return;
        }
        let deck = Deck::shuffled(&mut self.rng);
        self.initialize_with_deck(deck);
    }

    /// Like [`Game::initialize`] but deals from `deck` as given
    pub fn initialize_with_deck(&mut self, deck: Deck) {
        self.phase = Some(Phase::PlayerTurn);
        self.player.get_or_insert_with(Player::new);
        self.deck = Some(deck);
    }

    /// Clear the table and start over. Hand and flags are always cleared;
    /// with `keep_agent == false` the player and its policy are dropped too.
    pub fn reset(&mut self, keep_agent: bool) {
        self.phase = None;
        self.deck = None;
        if keep_agent {
            if let Some(player) = self.player.as_mut() {
                player.reset();
            }
        } else {
            self.player = None;
            self.policy = None;
        }
        self.initialize();
    }

    pub fn is_initialized(&self) -> bool {
        self.phase.is_some() && self.deck.is_some() && self.player.is_some()
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    pub fn phase(&self) -> Option<Phase> {
        self.phase
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn deck(&self) -> Option<&Deck> {
        self.deck.as_ref()
    }

    pub fn set_policy(&mut self, policy: Box<dyn Policy>) {
        self.policy = Some(policy);
    }

    pub fn has_policy(&self) -> bool {
        self.policy.is_some()
    }

    fn table(&self) -> Result<(&Player, Phase)> {
        match (self.player.as_ref(), self.phase, self.deck.is_some()) {
            (Some(player), Some(phase), true) => Ok((player, phase)),
            _ => Err(GameError::NotInitialized),
        }
    }

    /// Apply `action` to the current state and install the resulting phase
    pub fn apply_action(&mut self, action: &mut Action) -> Result<Phase> {
        let (Some(phase), Some(player), Some(deck)) =
            (self.phase, self.player.as_mut(), self.deck.as_mut())
        else {
            return Err(GameError::NotInitialized);
        };

        let next = action.execute(player, deck, phase)?;
        self.phase = Some(next);
        Ok(next)
    }

    /// Apply the registry action at `index`; returns the executed action
    pub fn apply_index(&mut self, index: usize) -> Result<Action> {
        let mut action = self.registry.action_at(index)?;
        self.apply_action(&mut action)?;
        Ok(action)
    }

    pub fn legality_mask(&self) -> Result<Vec<bool>> {
        let (player, phase) = self.table()?;
        Ok(self.registry.legality_mask(player, phase))
    }

    pub fn legal_actions(&self) -> Result<Vec<Action>> {
        let (player, phase) = self.table()?;
        Ok(self.registry.legal_actions(player, phase))
    }

    /// Encoded state for the value network
    pub fn observation(&self) -> Result<Vec<f32>> {
        let (player, _) = self.table()?;
        Ok(encoding::observation(player))
    }

    /// The episode is over once the player is broken or stopped
    pub fn is_terminal(&self) -> bool {
        self.player
            .as_ref()
            .map(|p| p.is_broken() || p.is_stopped())
            .unwrap_or(false)
    }

    pub fn player_won(&self) -> bool {
        self.player
            .as_ref()
            .map(|p| p.is_stopped() && p.score() <= TARGET_SCORE)
            .unwrap_or(false)
    }

    /// Let the installed policy pick and apply one action.
    ///
    /// Returns `None` when the episode is already over.
    pub fn play_single_step(&mut self, verbose: bool) -> Result<Option<Action>> {
        let (Some(player), Some(phase), true) =
            (self.player.as_ref(), self.phase, self.deck.is_some())
        else {
            return Err(GameError::NotInitialized);
        };
        if player.is_broken() || player.is_stopped() {
            return Ok(None);
        }
        if verbose {
            println!("{player}");
        }

        let mask = self.registry.legality_mask(player, phase);
        let features = encoding::observation(player);
        let observation = Observation {
            player,
            phase,
            mask: &mask,
            features: &features,
        };
        let policy = self.policy.as_mut().ok_or(GameError::NoPolicy)?;
        let index = policy.choose(&observation)?;

        let mut action = self.registry.action_at(index)?;
        if verbose {
            println!("Executing {action}");
        }
        self.apply_action(&mut action)?;
        Ok(Some(action))
    }
}
