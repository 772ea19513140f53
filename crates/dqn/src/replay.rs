use std::collections::VecDeque;

use rand::Rng;

use crate::error::{DqnError, Result};

/// One environment step as seen by the learner
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: Vec<f32>,
    pub action: usize,
    pub reward: f32,
    /// Legality mask the action was chosen under
    pub mask: Vec<bool>,
    pub next_state: Vec<f32>,
    pub done: bool,
}

/// Bounded FIFO of transitions with uniform sampling.
///
/// When full, the oldest transition is evicted before a new one is stored.
#[derive(Debug, Clone)]
pub struct ReplayBuffer {
    items: VecDeque<Transition>,
    capacity: usize,
    min_experiences: usize,
}

impl ReplayBuffer {
    pub fn new(capacity: usize, min_experiences: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
            min_experiences,
        }
    }

    pub fn add(&mut self, transition: Transition) {
        if self.items.len() == self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(transition);
    }

    /// Whether enough experiences are stored to start training
    pub fn is_ready(&self) -> bool {
        self.items.len() >= self.min_experiences
    }

    /// Draw `n` transitions uniformly, with replacement
    pub fn sample_batch<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Result<Vec<&Transition>> {
        if !self.is_ready() || self.items.is_empty() {
            return Err(DqnError::InsufficientData {
                have: self.items.len(),
                need: self.min_experiences.max(1),
            });
        }
        Ok((0..n)
            .map(|_| &self.items[rng.gen_range(0..self.items.len())])
            .collect())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn min_experiences(&self) -> usize {
        self.min_experiences
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.items.iter()
    }
}
