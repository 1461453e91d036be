//! Best-move command - answer one move query for a serialized board
//!
//! This is the boundary an external game server talks to: it hands over the
//! stored board and the side to move, and gets back a move or a pass.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use reversi_core::{AiConfig, AlphaBetaAI, Board, Move, Player, Score, Strategy};

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args)]
pub struct BestMoveArgs {
    /// Board JSON file (8x8 grid of 0/1/2), or "-" for stdin
    #[arg(long, value_name = "FILE", default_value = "-")]
    pub board: PathBuf,

    /// Side to move: black/white (or 1/2)
    #[arg(long)]
    pub player: Player,

    /// Override the configured search depth
    #[arg(long)]
    pub depth: Option<u32>,
}

/// JSON reply
#[derive(Debug, Serialize)]
struct BestMoveResponse {
    /// Recommended move, null when the player must pass
    #[serde(rename = "move")]
    mv: Option<Move>,
    strategy: Strategy,
    score: Option<i32>,
    nodes: u64,
    pieces: Score,
    game_over: bool,
}

// ============================================================================
// ORCHESTRATION
// ============================================================================

pub fn run(args: BestMoveArgs, config: AiConfig) -> Result<()> {
    let config = crate::with_depth(config, args.depth)?;
    let board = read_board(&args.board)?;

    tracing::info!(
        "Selecting move for {} ({} discs on board, depth={})",
        args.player,
        board.total_pieces(),
        config.depth
    );

    let response = respond(&board, args.player, config);

    match response.mv {
        Some(mv) => tracing::info!(
            "{:?} chose {} after {} nodes",
            response.strategy,
            mv,
            response.nodes
        ),
        None => tracing::info!("{} has no legal move and must pass", args.player),
    }

    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}

// ============================================================================
// STEPS
// ============================================================================

fn respond(board: &Board, player: Player, config: AiConfig) -> BestMoveResponse {
    let mut ai = AlphaBetaAI::new(config);
    let result = ai.search(board, player);

    BestMoveResponse {
        mv: result.best_move,
        strategy: result.strategy,
        score: result.score,
        nodes: result.nodes,
        pieces: board.score(),
        game_over: board.is_game_over(),
    }
}

/// Read a board from a file, or stdin for "-"
fn read_board(path: &Path) -> Result<Board> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read board from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read board file: {}", path.display()))?
    };

    let board = Board::from_json(&content).context("Invalid board")?;
    Ok(board)
}

// ============================================================================
// TESTS
// ============================================================================
