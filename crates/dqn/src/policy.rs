use blackjack_core::{GameError, Observation, Policy};

use crate::exploration::masked_argmax;
use crate::model::{predict_one, QValueModel};

/// Plays the best legal action according to a trained model
pub struct GreedyPolicy<M: QValueModel> {
    model: M,
}

impl<M: QValueModel> GreedyPolicy<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }
}

impl<M: QValueModel> Policy for GreedyPolicy<M> {
    fn choose(&mut self, observation: &Observation<'_>) -> blackjack_core::Result<usize> {
        let values = predict_one(&self.model, observation.features)
            .map_err(|e| GameError::PolicyFailed(e.to_string()))?;
        masked_argmax(&values, observation.mask)
            .ok_or_else(|| GameError::PolicyFailed("no legal actions".into()))
    }
}
