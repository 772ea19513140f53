use std::collections::HashMap;

use crate::action::{Action, ActionKind};
use crate::error::{GameError, Result};
use crate::phase::Phase;
use crate::player::Player;

/// Fixed, ordered catalog of every action. Index `i` is the action's
/// position in the network's output vector.
#[derive(Debug, Clone)]
pub struct ActionRegistry {
    prototypes: Vec<Action>,
    index: HashMap<ActionKind, usize>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        let prototypes = vec![Action::draw(), Action::stand()];
        let index = prototypes
            .iter()
            .enumerate()
            .map(|(i, action)| (action.key(), i))
            .collect();
        Self { prototypes, index }
    }

    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }

    pub fn index_of(&self, action: &Action) -> Option<usize> {
        self.index.get(&action.key()).copied()
    }

    /// Fresh copy of the action at `index`, safe to execute
    pub fn action_at(&self, index: usize) -> Result<Action> {
        self.prototypes
            .get(index)
            .map(|proto| Action::new(proto.key()))
            .ok_or(GameError::UnknownAction(index))
    }

    pub fn legality_mask(&self, player: &Player, phase: Phase) -> Vec<bool> {
        self.prototypes
            .iter()
            .map(|action| action.validate(player, phase, false))
            .collect()
    }

    pub fn legal_actions(&self, player: &Player, phase: Phase) -> Vec<Action> {
        self.prototypes
            .iter()
            .filter(|action| action.validate(player, phase, false))
            .map(|action| Action::new(action.key()))
            .collect()
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
