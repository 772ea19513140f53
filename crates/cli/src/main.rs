use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tch::{Cuda, Device};

use blackjack_core::{ActionRegistry, Game, RandomPolicy, STATE_SIZE};
use blackjack_dqn::{
    BlackjackEnv, DqnConfig, FileSink, GreedyPolicy, QValueModel, StdoutSink, Trainer,
};
use blackjack_nn::QNetwork;
use blackjack_selfplay::{evaluate, play_game, EvaluationReport};

/// Penalties tried by `sweep`: 0, -3, ..., -27
const SWEEP_PENALTIES: usize = 10;
const SWEEP_STEP: f32 = -3.0;

#[derive(Debug, Parser)]
#[command(
    name = "blackjack",
    about = "Single-player blackjack engine with a DQN agent",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Train a Q-network and save its weights
    Train(ConfigArgs),
    /// Play one game, printing every step
    Play(AgentArgs),
    /// Play many games and report bust rate and mean score
    Evaluate {
        #[command(flatten)]
        agent: AgentArgs,

        /// Number of games to play.
        #[arg(long, default_value_t = 100)]
        games: usize,
    },
    /// Train and evaluate one agent per stand-early penalty
    Sweep {
        #[command(flatten)]
        config: ConfigArgs,

        /// Evaluation games per penalty.
        #[arg(long, default_value_t = 100)]
        games: usize,
    },
}

#[derive(Debug, Args)]
struct ConfigArgs {
    /// YAML training configuration; defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of training episodes.
    #[arg(long)]
    episodes: Option<u32>,

    /// Reward added to a Stand below 21 (usually negative).
    #[arg(long, allow_hyphen_values = true)]
    penalty: Option<f32>,

    #[arg(long)]
    seed: Option<u64>,

    /// Where the trained weights are written.
    #[arg(long)]
    save_path: Option<PathBuf>,

    /// Directory for the per-episode JSONL metrics.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Force CPU even when CUDA is available.
    #[arg(long)]
    cpu: bool,
}

#[derive(Debug, Args)]
struct AgentArgs {
    /// Trained weights; the random agent plays when omitted.
    #[arg(long)]
    model: Option<PathBuf>,

    /// YAML configuration the model was trained with (network shape).
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 0)]
    seed: u64,

    #[arg(long)]
    cpu: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Train(args) => run_train(&args),
        Command::Play(args) => run_play(&args),
        Command::Evaluate { agent, games } => run_evaluate(&agent, games),
        Command::Sweep { config, games } => run_sweep(&config, games),
    }
}

fn select_device(cpu: bool) -> Device {
    if cpu {
        return Device::Cpu;
    }
    let device = Device::cuda_if_available();
    println!(
        "Using device: {:?} (cuda devices: {})",
        device,
        Cuda::device_count()
    );
    device
}

fn load_config(path: Option<&Path>) -> Result<DqnConfig> {
    match path {
        Some(p) => DqnConfig::load(p).with_context(|| format!("loading config {}", p.display())),
        None => Ok(DqnConfig::default()),
    }
}

fn resolve_config(args: &ConfigArgs) -> Result<DqnConfig> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(episodes) = args.episodes {
        config = config.with_episodes(episodes);
    }
    if let Some(penalty) = args.penalty {
        config = config.with_penalty(penalty);
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(path) = &args.save_path {
        config = config.with_save_path(path);
    }
    if let Some(dir) = &args.log_dir {
        config = config.with_log_dir(dir);
    }
    config.validate()?;
    Ok(config)
}

fn new_network(config: &DqnConfig, device: Device) -> Result<QNetwork> {
    let num_actions = ActionRegistry::new().len();
    let net = QNetwork::new(
        STATE_SIZE,
        num_actions,
        &config.model,
        config.learning_rate,
        device,
    )?;
    Ok(net)
}

/// Train one agent, logging each episode to `log_path` and summaries to stdout
fn train(config: &DqnConfig, device: Device, log_path: &Path) -> Result<QNetwork> {
    tch::manual_seed(config.seed as i64);
    let online = new_network(config, device)?;
    let target = new_network(config, device)?;
    let mut env = BlackjackEnv::new(ActionRegistry::new(), config.penalty, config.seed);
    let file_sink = FileSink::create(log_path)
        .with_context(|| format!("creating episode log {}", log_path.display()))?;
    println!("Logging episodes to {}", log_path.display());

    let mut trainer = Trainer::new(config.clone(), online, target)?;
    let report = trainer.run(&mut env, &mut (StdoutSink, file_sink))?;
    println!(
        "avg reward for last 100 episodes: {:.3} ({} steps, final eps {:.4})",
        report.running_avg, report.total_steps, report.final_epsilon
    );
    Ok(trainer.into_online())
}

fn save_network(net: &QNetwork, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    net.save(path)?;
    println!("Saved weights to {}", path.display());
    Ok(())
}

/// A game whose agent is the greedy network, or the random agent without one
fn agent_game(net: Option<QNetwork>, seed: u64) -> Game {
    let mut game = Game::new(ActionRegistry::new(), seed);
    game.initialize();
    match net {
        Some(net) => game.set_policy(Box::new(GreedyPolicy::new(net))),
        None => game.set_policy(Box::new(RandomPolicy::new(seed))),
    }
    game
}

fn load_agent(args: &AgentArgs) -> Result<Game> {
    let Some(model_path) = &args.model else {
        println!("No model given, playing with the random agent");
        return Ok(agent_game(None, args.seed));
    };

    let config = load_config(args.config.as_deref())?;
    let mut net = new_network(&config, select_device(args.cpu))?;
    net.load_weights(model_path)
        .with_context(|| format!("loading weights {}", model_path.display()))?;
    Ok(agent_game(Some(net), args.seed))
}

/// `models/q.ot` -> `models/q_penalty-3.ot`
fn with_penalty_suffix(path: &Path, penalty: f32) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}_penalty{penalty}.{}", ext.to_string_lossy()),
        None => format!("{stem}_penalty{penalty}"),
    };
    path.with_file_name(name)
}

fn format_mean(report: &EvaluationReport) -> String {
    report
        .mean_score
        .map(|m| format!("{m:.2}"))
        .unwrap_or_else(|| "n/a".to_string())
}

fn run_train(args: &ConfigArgs) -> Result<()> {
    let config = resolve_config(args)?;
    println!(
        "blackjack train | episodes={} | penalty={} | seed={} | hidden={:?}",
        config.episodes, config.penalty, config.seed, config.model.hidden_units
    );
    let net = train(&config, select_device(args.cpu), &config.episode_log_path())?;
    save_network(&net, &config.save_path)
}

fn run_play(args: &AgentArgs) -> Result<()> {
    let mut game = load_agent(args)?;
    let record = play_game(&mut game, true)?;

    println!("GAME FINISHED");
    if let Some(player) = game.player() {
        println!("{player}");
    }
    if record.won {
        println!("Player won with score of {}", record.final_score);
    } else {
        println!("Player broke with score of {}", record.final_score);
    }
    Ok(())
}

fn run_evaluate(args: &AgentArgs, games: usize) -> Result<()> {
    let mut game = load_agent(args)?;
    let report = evaluate(&mut game, games)?;
    println!("Games: {}", report.games);
    println!("Break Percent: {:.0}%", report.bust_percent);
    println!("Average score: {}", format_mean(&report));
    Ok(())
}

fn run_sweep(args: &ConfigArgs, games: usize) -> Result<()> {
    let base = resolve_config(args)?;
    let device = select_device(args.cpu);

    let mut rows = Vec::with_capacity(SWEEP_PENALTIES);
    for i in 0..SWEEP_PENALTIES {
        let penalty = SWEEP_STEP * i as f32;
        let config = base.clone().with_penalty(penalty);
        let log_path = with_penalty_suffix(&config.episode_log_path(), penalty);
        let net = train(&config, device, &log_path)?;
        save_network(&net, &with_penalty_suffix(&config.save_path, penalty))?;

        let mut game = agent_game(Some(net), config.seed);
        let report = evaluate(&mut game, games)?;
        println!("Penalty: {penalty}");
        println!("Break Percent: {:.0}%", report.bust_percent);
        println!("Average score: {}", format_mean(&report));
        rows.push((penalty, report));
    }

    for (penalty, report) in &rows {
        println!("{} {:.0} {}", penalty, report.bust_percent, format_mean(report));
    }
    Ok(())
}
