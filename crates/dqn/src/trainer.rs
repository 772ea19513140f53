use std::collections::VecDeque;
use std::path::Path;

use blackjack_core::ActionKind;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::DqnConfig;
use crate::env::{BlackjackEnv, Step};
use crate::error::{DqnError, Result};
use crate::exploration::select_action;
use crate::model::{max_value, QValueModel};
use crate::replay::{ReplayBuffer, Transition};
use crate::telemetry::{EpisodeStats, TrainingSink};

/// Episodes averaged for the running reward
const REWARD_WINDOW: usize = 100;

/// Result of one played episode
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeOutcome {
    pub total_reward: f32,
    pub steps: u64,
    pub final_score: u32,
    pub broken: bool,
}

/// Summary of a full training run
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    pub episodes: u32,
    pub total_steps: u64,
    pub final_epsilon: f32,
    /// Mean reward of the last 100 episodes
    pub running_avg: f32,
    /// Total reward of every episode, in order
    pub rewards: Vec<f32>,
}

/// Deep Q-learning with experience replay and a target network.
///
/// Owns the online model (trained every step), the target model (refreshed
/// every `copy_step` environment steps) and the replay buffer.
pub struct Trainer<M: QValueModel> {
    config: DqnConfig,
    online: M,
    target: M,
    buffer: ReplayBuffer,
    epsilon: f32,
    rng: StdRng,
    total_steps: u64,
    episodes_played: u32,
    recent_rewards: VecDeque<f32>,
}

impl<M: QValueModel> Trainer<M> {
    /// `online` and `target` must be independent instances of the same shape
    pub fn new(config: DqnConfig, online: M, target: M) -> Result<Self> {
        config.validate()?;
        if online.num_actions() != target.num_actions() {
            return Err(DqnError::OutputWidth {
                expected: online.num_actions(),
                actual: target.num_actions(),
            });
        }

        Ok(Self {
            buffer: ReplayBuffer::new(config.max_experiences, config.min_experiences),
            epsilon: config.epsilon,
            rng: StdRng::seed_from_u64(config.seed),
            total_steps: 0,
            episodes_played: 0,
            recent_rewards: VecDeque::with_capacity(REWARD_WINDOW),
            config,
            online,
            target,
        })
    }

    pub fn config(&self) -> &DqnConfig {
        &self.config
    }

    pub fn online(&self) -> &M {
        &self.online
    }

    pub fn target(&self) -> &M {
        &self.target
    }

    pub fn buffer(&self) -> &ReplayBuffer {
        &self.buffer
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    pub fn into_online(self) -> M {
        self.online
    }

    /// One gradient step on a replay batch.
    ///
    /// Returns `None` without touching the model while the buffer holds
    /// fewer than `min_experiences` transitions.
    pub fn train_step(&mut self) -> Result<Option<f32>> {
        if !self.buffer.is_ready() {
            return Ok(None);
        }
        let batch = self.buffer.sample_batch(self.config.batch_size, &mut self.rng)?;

        let next_states: Vec<&[f32]> = batch.iter().map(|t| t.next_state.as_slice()).collect();
        let next_values = self.target.predict(&next_states)?;

        let gamma = self.config.gamma;
        let targets: Vec<f32> = batch
            .iter()
            .zip(&next_values)
            .map(|(t, row)| {
                if t.done {
                    t.reward
                } else {
                    t.reward + gamma * max_value(row)
                }
            })
            .collect();
        let states: Vec<&[f32]> = batch.iter().map(|t| t.state.as_slice()).collect();
        let actions: Vec<usize> = batch.iter().map(|t| t.action).collect();

        let loss = self.online.train_step(&states, &actions, &targets)?;
        Ok(Some(loss))
    }

    /// Overwrite the target model with the online model's parameters
    pub fn sync_target(&mut self) -> Result<()> {
        self.target.copy_parameters_from(&self.online)
    }

    /// One environment step: select, apply, record, train, then the
    /// periodic replay dump and target sync.
    pub fn step(&mut self, env: &mut BlackjackEnv, sink: &mut dyn TrainingSink) -> Result<Step> {
        let state = env.observation()?;
        let mask = env.legality_mask()?;
        let action = select_action(&self.online, &state, &mask, self.epsilon, &mut self.rng)?;
        let step = env.step(action)?;

        self.buffer.add(Transition {
            state,
            action,
            reward: step.reward,
            mask,
            next_state: step.state.clone(),
            done: step.done,
        });
        self.train_step()?;
        self.total_steps += 1;

        let print_every = self.config.print_exp_step;
        if print_every > 0 && self.total_steps % print_every == 0 {
            let actions = self.buffered_actions(env)?;
            sink.experience_replay(self.total_steps, &actions);
        }
        if self.total_steps % self.config.copy_step == 0 {
            self.sync_target()?;
            sink.target_synced(self.total_steps);
        }
        Ok(step)
    }

    fn buffered_actions(&self, env: &BlackjackEnv) -> Result<Vec<ActionKind>> {
        self.buffer
            .iter()
            .map(|t| -> Result<ActionKind> { Ok(env.registry().action_at(t.action)?.key()) })
            .collect()
    }

    /// Play one episode from a fresh deck until the player is broken or stopped
    pub fn play_episode(
        &mut self,
        env: &mut BlackjackEnv,
        sink: &mut dyn TrainingSink,
    ) -> Result<EpisodeOutcome> {
        env.reset()?;
        let mut total_reward = 0.0;
        let mut steps = 0;
        while !env.is_done() {
            let step = self.step(env, sink)?;
            total_reward += step.reward;
            steps += 1;
        }

        let player = env
            .game()
            .player()
            .ok_or(DqnError::Game(blackjack_core::GameError::NotInitialized))?;
        Ok(EpisodeOutcome {
            total_reward,
            steps,
            final_score: player.score(),
            broken: player.is_broken(),
        })
    }

    /// Play one episode, report it, then decay epsilon
    pub fn run_episode(
        &mut self,
        env: &mut BlackjackEnv,
        sink: &mut dyn TrainingSink,
    ) -> Result<EpisodeStats> {
        let epsilon = self.epsilon;
        let outcome = self.play_episode(env, sink)?;

        if self.recent_rewards.len() == REWARD_WINDOW {
            self.recent_rewards.pop_front();
        }
        self.recent_rewards.push_back(outcome.total_reward);

        let stats = EpisodeStats {
            episode: self.episodes_played,
            total_reward: outcome.total_reward,
            running_avg: self.running_avg(),
            epsilon,
            steps: outcome.steps,
            final_score: outcome.final_score,
            broken: outcome.broken,
        };
        sink.episode_finished(&stats);
        if stats.episode % self.config.summary_every.max(1) == 0 {
            sink.summary(&stats);
        }

        self.episodes_played += 1;
        self.decay_epsilon();
        Ok(stats)
    }

    /// Run `config.episodes` episodes
    pub fn run(
        &mut self,
        env: &mut BlackjackEnv,
        sink: &mut dyn TrainingSink,
    ) -> Result<TrainingReport> {
        let mut rewards = Vec::with_capacity(self.config.episodes as usize);
        for _ in 0..self.config.episodes {
            let stats = self.run_episode(env, sink)?;
            rewards.push(stats.total_reward);
        }

        Ok(TrainingReport {
            episodes: self.episodes_played,
            total_steps: self.total_steps,
            final_epsilon: self.epsilon,
            running_avg: self.running_avg(),
            rewards,
        })
    }

    /// Write the online model
    pub fn save(&self, path: &Path) -> Result<()> {
        self.online.save(path)
    }

    fn decay_epsilon(&mut self) {
        self.epsilon = (self.epsilon * self.config.decay).max(self.config.min_epsilon);
    }

    fn running_avg(&self) -> f32 {
        if self.recent_rewards.is_empty() {
            return 0.0;
        }
        self.recent_rewards.iter().sum::<f32>() / self.recent_rewards.len() as f32
    }
}
