use anyhow::{bail, Result};
use blackjack_core::Game;

use crate::data::{EvaluationReport, GameRecord};

/// Play the current game to the end with the installed policy.
///
/// An uninitialized game is dealt a fresh deck first. With `verbose` the
/// player's state and each executed action are printed.
pub fn play_game(game: &mut Game, verbose: bool) -> Result<GameRecord> {
    if !game.has_policy() {
        bail!("no policy installed");
    }
    if !game.is_initialized() {
        game.initialize();
    }

    let mut record = GameRecord::new();
    while let Some(action) = game.play_single_step(verbose)? {
        record.add_action(action.key());
    }

    let Some(player) = game.player() else {
        bail!("game lost its player");
    };
    record.final_score = player.score();
    record.broken = player.is_broken();
    record.won = game.player_won();
    Ok(record)
}

/// Play `games` fresh games, keeping the agent between them
pub fn play_games(game: &mut Game, games: usize) -> Result<Vec<GameRecord>> {
    let mut records = Vec::with_capacity(games);
    for _ in 0..games {
        game.reset(true);
        records.push(play_game(game, false)?);
    }
    Ok(records)
}

/// Bust rate and mean score over `games` games
pub fn evaluate(game: &mut Game, games: usize) -> Result<EvaluationReport> {
    if games == 0 {
        bail!("cannot evaluate over zero games");
    }
    let records = play_games(game, games)?;
    Ok(EvaluationReport::from_records(&records))
}
