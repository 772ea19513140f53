use rand::seq::IteratorRandom;
use rand::Rng;

use crate::error::{DqnError, Result};
use crate::model::{predict_one, QValueModel};

/// Epsilon-greedy action selection restricted to legal actions.
///
/// With probability `epsilon` a legal index is drawn uniformly; otherwise
/// the model is queried and the best legal index is returned. Illegal
/// indices can never be returned, whatever values the model assigns them.
pub fn select_action<M: QValueModel, R: Rng + ?Sized>(
    model: &M,
    state: &[f32],
    mask: &[bool],
    epsilon: f32,
    rng: &mut R,
) -> Result<usize> {
    if !mask.iter().any(|&legal| legal) {
        return Err(DqnError::NoLegalActions);
    }

    if rng.gen::<f32>() < epsilon {
        return random_legal(mask, rng);
    }

    let values = predict_one(model, state)?;
    if values.len() != mask.len() {
        return Err(DqnError::OutputWidth {
            expected: mask.len(),
            actual: values.len(),
        });
    }
    masked_argmax(&values, mask).ok_or(DqnError::NoLegalActions)
}

/// Uniform choice among indices where `mask` is true
pub fn random_legal<R: Rng + ?Sized>(mask: &[bool], rng: &mut R) -> Result<usize> {
    mask.iter()
        .enumerate()
        .filter(|&(_, &legal)| legal)
        .map(|(i, _)| i)
        .choose(rng)
        .ok_or(DqnError::NoLegalActions)
}

/// Replace every masked-out value with `min(values) - 1`
pub fn mask_values(values: &[f32], mask: &[bool]) -> Vec<f32> {
    let floor = values.iter().copied().fold(f32::INFINITY, f32::min) - 1.0;
    values
        .iter()
        .zip(mask)
        .map(|(&v, &legal)| if legal { v } else { floor })
        .collect()
}

/// First index of the maximum of the masked values, `None` without legal entries
pub fn masked_argmax(values: &[f32], mask: &[bool]) -> Option<usize> {
    let adjusted = mask_values(values, mask);

    // `min - 1` rounds back to `min` for large magnitudes, so skip illegal
    // slots outright as well.
    let mut best: Option<(usize, f32)> = None;
    for (i, (&v, &legal)) in adjusted.iter().zip(mask).enumerate() {
        if !legal {
            continue;
        }
        match best {
            Some((_, best_v)) if !(v > best_v || best_v.is_nan()) => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}
