use std::path::Path;

use crate::error::{DqnError, Result};

/// Minimal interface required from a trainable action-value network.
///
/// Implementations map a batch of state vectors to one value per action and
/// own their parameters exclusively; two instances never share storage.
pub trait QValueModel {
    /// Width of an input state vector
    fn state_size(&self) -> usize;

    /// Width of an output row
    fn num_actions(&self) -> usize;

    /// Action values for each state in the batch
    fn predict(&self, states: &[&[f32]]) -> Result<Vec<Vec<f32>>>;

    /// One gradient step on `sum_i (targets[i] - Q(states[i])[actions[i]])^2`.
    /// Returns the loss before the update.
    fn train_step(&mut self, states: &[&[f32]], actions: &[usize], targets: &[f32]) -> Result<f32>;

    /// Overwrite every parameter with a copy of `other`'s
    fn copy_parameters_from(&mut self, other: &Self) -> Result<()>;

    /// Write the parameters in the model's native format
    fn save(&self, path: &Path) -> Result<()>;
}

/// Action values for a single state, checked against the model's output width
pub fn predict_one<M: QValueModel>(model: &M, state: &[f32]) -> Result<Vec<f32>> {
    let mut rows = model.predict(&[state])?;
    let row = rows
        .pop()
        .ok_or_else(|| DqnError::Model("empty prediction batch".into()))?;
    if row.len() != model.num_actions() {
        return Err(DqnError::OutputWidth {
            expected: model.num_actions(),
            actual: row.len(),
        });
    }
    Ok(row)
}

/// Largest value in a row; `NEG_INFINITY` for an empty row
pub fn max_value(values: &[f32]) -> f32 {
    values.iter().copied().fold(f32::NEG_INFINITY, f32::max)
}
