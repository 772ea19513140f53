use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::SeedableRng;

use crate::error::{GameError, Result};
use crate::phase::Phase;
use crate::player::Player;

/// What a policy sees at a decision point
pub struct Observation<'a> {
    pub player: &'a Player,
    pub phase: Phase,
    /// Legality mask aligned to the action registry
    pub mask: &'a [bool],
    /// Encoded state, see [`crate::encoding::observation`]
    pub features: &'a [f32],
}

/// Decision rule of an agent: picks an action index for the current state
pub trait Policy {
    fn choose(&mut self, observation: &Observation<'_>) -> Result<usize>;
}

/// Uniform choice among legal actions
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn choose(&mut self, observation: &Observation<'_>) -> Result<usize> {
        observation
            .mask
            .iter()
            .enumerate()
            .filter(|&(_, &legal)| legal)
            .map(|(i, _)| i)
            .choose(&mut self.rng)
            .ok_or_else(|| GameError::PolicyFailed("no legal actions".into()))
    }
}
