//! Match command - play AI-vs-AI games between two search depths
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_match(), report_results()
//! - Level 3: play_single_game(), compute_match_statistics()
//! - Level 4: formatting utilities

use anyhow::Result;
use clap::Args;
use rayon::prelude::*;

use reversi_core::{AiConfig, AlphaBetaAI, Board, GameResult, Move, Player, Score};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    /// Number of games to play
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Search depth for the black AI
    #[arg(long, default_value = "4")]
    pub black_depth: u32,

    /// Search depth for the white AI
    #[arg(long, default_value = "4")]
    pub white_depth: u32,

    /// Run games on all cores
    #[arg(long)]
    pub parallel: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug)]
struct GameRecord {
    game_number: usize,
    result: GameResult,
    score: Score,
    /// Black discs minus white discs
    disc_difference: i32,
    passes: usize,
    #[allow(dead_code)] // Kept for replay when debugging a match
    moves: Vec<(Player, Move)>,
}

/// Aggregated match results
#[derive(Clone, Debug)]
struct MatchResults {
    games: Vec<GameRecord>,
    black_wins: usize,
    white_wins: usize,
    draws: usize,
    /// Mean of black discs minus white discs
    avg_disc_difference: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
///
/// 1. Build one configuration per color
/// 2. Play the match (multiple games)
/// 3. Report results
pub fn run(args: MatchArgs, config: AiConfig) -> Result<()> {
    let black_config = crate::with_depth(config.clone(), Some(args.black_depth))?;
    let white_config = crate::with_depth(config, Some(args.white_depth))?;

    tracing::info!(
        "Starting match: black depth {} vs white depth {} ({} games{})",
        args.black_depth,
        args.white_depth,
        args.games,
        if args.parallel { ", parallel" } else { "" }
    );

    let results = play_match(&black_config, &white_config, args.games, args.parallel)?;

    report_results(&results, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Play all games in the match
fn play_match(
    black_config: &AiConfig,
    white_config: &AiConfig,
    games: usize,
    parallel: bool,
) -> Result<MatchResults> {
    let base_seed = black_config.seed.unwrap_or(42);

    let play = |index: usize| -> Result<GameRecord> {
        let seed = base_seed.wrapping_add(index as u64);
        let record = play_single_game(black_config, white_config, index + 1, seed)?;
        tracing::info!(
            "Game {}: {:?} ({}-{}, {} passes)",
            record.game_number,
            record.result,
            record.score.black,
            record.score.white,
            record.passes
        );
        Ok(record)
    };

    let records = if parallel {
        (0..games).into_par_iter().map(play).collect::<Result<Vec<_>>>()?
    } else {
        (0..games).map(play).collect::<Result<Vec<_>>>()?
    };

    Ok(compute_match_statistics(records))
}

/// Report match results
fn report_results(results: &MatchResults, args: &MatchArgs) {
    if args.json {
        print_json_results(results, args);
    } else {
        print_text_results(results, args);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play one game from the standard opening, each color with its own AI
fn play_single_game(
    black_config: &AiConfig,
    white_config: &AiConfig,
    game_number: usize,
    seed: u64,
) -> Result<GameRecord> {
    let mut black = AlphaBetaAI::with_seed(black_config.clone(), seed);
    let mut white = AlphaBetaAI::with_seed(white_config.clone(), seed.rotate_left(32));

    let mut board = Board::new();
    let mut moves = Vec::new();
    let mut passes = 0;
    let mut to_move = Some(Player::Black);

    while let Some(player) = to_move {
        let ai = match player {
            Player::Black => &mut black,
            Player::White => &mut white,
        };
        let Some(mv) = ai.best_move(&board, player) else {
            break;
        };

        board.apply_move(mv.row as usize, mv.col as usize, player)?;
        moves.push((player, mv));

        to_move = board.next_to_move(player);
        if to_move == Some(player) {
            passes += 1;
        }
    }

    Ok(GameRecord {
        game_number,
        result: board.result(),
        score: board.score(),
        disc_difference: board.piece_difference(Player::Black),
        passes,
        moves,
    })
}

/// Aggregate per-game records
fn compute_match_statistics(games: Vec<GameRecord>) -> MatchResults {
    let black_wins = games.iter().filter(|g| g.result == GameResult::BlackWins).count();
    let white_wins = games.iter().filter(|g| g.result == GameResult::WhiteWins).count();
    let draws = games.iter().filter(|g| g.result == GameResult::Draw).count();

    let avg_disc_difference = if games.is_empty() {
        0.0
    } else {
        games
            .iter()
            .map(|g| g.disc_difference as f32)
            .sum::<f32>()
            / games.len() as f32
    };

    MatchResults {
        games,
        black_wins,
        white_wins,
        draws,
        avg_disc_difference,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn percent(count: usize, total: usize) -> f32 {
    if total > 0 {
        count as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

/// Print results as JSON
fn print_json_results(results: &MatchResults, args: &MatchArgs) {
    #[derive(serde::Serialize)]
    struct JsonGame {
        game_number: usize,
        result: GameResult,
        black: u32,
        white: u32,
        passes: usize,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        total_games: usize,
        black_depth: u32,
        white_depth: u32,
        black_wins: usize,
        white_wins: usize,
        draws: usize,
        avg_disc_difference: f32,
        games: Vec<JsonGame>,
    }

    let output = JsonOutput {
        total_games: results.games.len(),
        black_depth: args.black_depth,
        white_depth: args.white_depth,
        black_wins: results.black_wins,
        white_wins: results.white_wins,
        draws: results.draws,
        avg_disc_difference: results.avg_disc_difference,
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                result: g.result,
                black: g.score.black,
                white: g.score.white,
                passes: g.passes,
            })
            .collect(),
    };

    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{}", json),
        Err(e) => tracing::error!("Failed to serialize results: {}", e),
    }
}

/// Print results as text
fn print_text_results(results: &MatchResults, args: &MatchArgs) {
    let total = results.games.len();

    println!("\n=== Match Results ===");
    println!("Black depth {} vs White depth {}", args.black_depth, args.white_depth);
    println!("Total games: {}", total);
    println!(
        "Black wins:  {} ({:.1}%)",
        results.black_wins,
        percent(results.black_wins, total)
    );
    println!(
        "White wins:  {} ({:.1}%)",
        results.white_wins,
        percent(results.white_wins, total)
    );
    println!("Draws:       {} ({:.1}%)", results.draws, percent(results.draws, total));
    println!("Avg disc difference (black - white): {:+.1}", results.avg_disc_difference);

    println!("\nGame details:");
    for game in &results.games {
        println!(
            "  Game {}: {:?} {}-{}",
            game.game_number, game.result, game.score.black, game.score.white
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn record(game_number: usize, result: GameResult, black: u32, white: u32) -> GameRecord {
        GameRecord {
            game_number,
            result,
            score: Score { black, white },
            disc_difference: black as i32 - white as i32,
            passes: 0,
            moves: vec![],
        }
    }

    #[test]
    fn test_compute_match_statistics_empty() {
        let results = compute_match_statistics(vec![]);
        assert_eq!(results.black_wins, 0);
        assert_eq!(results.white_wins, 0);
        assert_eq!(results.draws, 0);
        assert_eq!(results.avg_disc_difference, 0.0);
    }

    #[test]
    fn test_compute_match_statistics() {
        let games = vec![
            record(1, GameResult::BlackWins, 40, 24),
            record(2, GameResult::WhiteWins, 20, 44),
            record(3, GameResult::Draw, 32, 32),
            record(4, GameResult::BlackWins, 36, 28),
        ];

        let results = compute_match_statistics(games);
        assert_eq!(results.black_wins, 2);
        assert_eq!(results.white_wins, 1);
        assert_eq!(results.draws, 1);
        assert_eq!(results.avg_disc_difference, 0.0);
    }

    #[test]
    fn test_play_single_game_finishes() {
        let config = AiConfig::default().with_depth(1);
        let record = play_single_game(&config, &config, 1, 3).unwrap();

        assert_ne!(record.result, GameResult::Ongoing);
        assert_eq!(record.score.total() as usize, 4 + record.moves.len());
        assert_eq!(
            record.disc_difference,
            record.score.black as i32 - record.score.white as i32
        );

        let mut replay = Board::new();
        for &(player, mv) in &record.moves {
            replay.apply_move(mv.row as usize, mv.col as usize, player).unwrap();
        }
        assert_eq!(replay.score(), record.score);
    }

    #[test]
    fn test_play_match_parallel_matches_sequential() {
        let config = AiConfig::default().with_depth(1).with_seed(10);
        let sequential = play_match(&config, &config, 3, false).unwrap();
        let parallel = play_match(&config, &config, 3, true).unwrap();

        assert_eq!(sequential.games.len(), 3);
        for (a, b) in sequential.games.iter().zip(&parallel.games) {
            assert_eq!(a.game_number, b.game_number);
            assert_eq!(a.score, b.score);
            assert_eq!(a.moves, b.moves);
        }
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(1, 4), 25.0);
        assert_eq!(percent(0, 0), 0.0);
    }
}
