// Telemetry sinks for training runs.
// - TrainingSink:  trait the trainer reports through
// - NoopSink:      discards everything
// - StdoutSink:    human-readable lines on stdout
// - RecordingSink: keeps everything in memory
// - FileSink:      one JSON line per episode, for plotting training curves
// - (A, B):        forwards every event to both sinks

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use blackjack_core::ActionKind;
use serde::{Deserialize, Serialize};

/// Per-episode numbers reported by the trainer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeStats {
    /// 0-based episode number
    pub episode: u32,
    pub total_reward: f32,
    /// Mean total reward over the last 100 episodes
    pub running_avg: f32,
    /// Exploration rate the episode was played with
    pub epsilon: f32,
    pub steps: u64,
    pub final_score: u32,
    pub broken: bool,
}

/// Abstract sink for training telemetry. Implementations must not fail the
/// training run.
pub trait TrainingSink {
    fn episode_finished(&mut self, stats: &EpisodeStats);

    /// Periodic summary, every `summary_every` episodes
    fn summary(&mut self, stats: &EpisodeStats);

    /// Actions currently held in the replay buffer, oldest first
    fn experience_replay(&mut self, step: u64, actions: &[ActionKind]);

    fn target_synced(&mut self, _step: u64) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl TrainingSink for NoopSink {
    fn episode_finished(&mut self, _stats: &EpisodeStats) {}

    fn summary(&mut self, _stats: &EpisodeStats) {}

    fn experience_replay(&mut self, _step: u64, _actions: &[ActionKind]) {}
}

/// Prints summaries and replay dumps; single episodes stay quiet
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl TrainingSink for StdoutSink {
    fn episode_finished(&mut self, _stats: &EpisodeStats) {}

    fn summary(&mut self, stats: &EpisodeStats) {
        println!(
            "episode: {} episode reward: {:.2} eps: {:.4} avg reward (last 100): {:.3}",
            stats.episode, stats.total_reward, stats.epsilon, stats.running_avg
        );
    }

    fn experience_replay(&mut self, step: u64, actions: &[ActionKind]) {
        println!("Experience replay (step {step}):");
        for action in actions {
            println!("{action}");
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub episodes: Vec<EpisodeStats>,
    pub summaries: Vec<EpisodeStats>,
    pub replays: Vec<(u64, Vec<ActionKind>)>,
    pub syncs: Vec<u64>,
}

impl TrainingSink for RecordingSink {
    fn episode_finished(&mut self, stats: &EpisodeStats) {
        self.episodes.push(stats.clone());
    }

    fn summary(&mut self, stats: &EpisodeStats) {
        self.summaries.push(stats.clone());
    }

    fn experience_replay(&mut self, step: u64, actions: &[ActionKind]) {
        self.replays.push((step, actions.to_vec()));
    }

    fn target_synced(&mut self, step: u64) {
        self.syncs.push(step);
    }
}

/// JSONL file sink.
///
/// Each finished episode is written as a single JSON object on its own line.
/// Write errors are ignored.
pub struct FileSink {
    writer: BufWriter<File>,
}

impl FileSink {
    /// Create (or truncate) `path`, creating missing parent directories
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl TrainingSink for FileSink {
    fn episode_finished(&mut self, stats: &EpisodeStats) {
        if let Ok(line) = serde_json::to_string(stats) {
            let _ = writeln!(self.writer, "{line}");
            let _ = self.writer.flush();
        }
    }

    fn summary(&mut self, _stats: &EpisodeStats) {}

    fn experience_replay(&mut self, _step: u64, _actions: &[ActionKind]) {}
}

impl<A: TrainingSink, B: TrainingSink> TrainingSink for (A, B) {
    fn episode_finished(&mut self, stats: &EpisodeStats) {
        self.0.episode_finished(stats);
        self.1.episode_finished(stats);
    }

    fn summary(&mut self, stats: &EpisodeStats) {
        self.0.summary(stats);
        self.1.summary(stats);
    }

    fn experience_replay(&mut self, step: u64, actions: &[ActionKind]) {
        self.0.experience_replay(step, actions);
        self.1.experience_replay(step, actions);
    }

    fn target_synced(&mut self, step: u64) {
        self.0.target_synced(step);
        self.1.target_synced(step);
    }
}
