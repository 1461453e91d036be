//! Play command - human vs AI in the terminal
//!
//! Coordinates are entered as `row col` (0-7 each, e.g. `2 3`) or in
//! algebraic form with the column letter first (e.g. `d3`).

use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::Args;

use reversi_core::{AiConfig, AlphaBetaAI, Board, Move, Player, Winner, BOARD_SIZE};

#[derive(Args)]
pub struct PlayArgs {
    /// Color played by the human: black/white
    #[arg(long, default_value = "black")]
    pub human: Player,

    /// Override the configured search depth
    #[arg(long)]
    pub depth: Option<u32>,
}

pub fn run(args: PlayArgs, config: AiConfig) -> Result<()> {
    let config = crate::with_depth(config, args.depth)?;

    tracing::info!(
        "Starting game: human plays {}, AI depth {}",
        args.human,
        config.depth
    );

    let mut ai = AlphaBetaAI::new(config);
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();

    let board = play_game(&mut ai, args.human, &mut input, &mut out)?;
    tracing::info!("Game finished: {:?}", board.result());
    Ok(())
}

/// Run the game loop until it ends or the human quits; returns the last board
fn play_game<B: BufRead, W: Write>(
    ai: &mut AlphaBetaAI,
    human: Player,
    input: &mut B,
    out: &mut W,
) -> Result<Board> {
    let mut board = Board::new();
    let mut to_move = Some(Player::Black);

    while let Some(player) = to_move {
        writeln!(out, "\n{}", board)?;
        let score = board.score();
        writeln!(out, "Black (X): {}  White (O): {}", score.black, score.white)?;

        let mv = if player == human {
            match prompt_move(&board, player, input, out)? {
                Some(mv) => mv,
                None => {
                    writeln!(out, "Game abandoned.")?;
                    return Ok(board);
                }
            }
        } else {
            let result = ai.search(&board, player);
            tracing::debug!(
                "AI {:?}: {:?} score={:?} nodes={}",
                result.strategy,
                result.best_move,
                result.score,
                result.nodes
            );
            match result.best_move {
                Some(mv) => {
                    writeln!(out, "{} (AI) plays {}", player, mv)?;
                    mv
                }
                None => break,
            }
        };

        board.apply_move(mv.row as usize, mv.col as usize, player)?;

        to_move = board.next_to_move(player);
        if to_move == Some(player) {
            writeln!(out, "{} has no legal move and passes.", player.opponent())?;
        }
    }

    writeln!(out, "\n{}", board)?;
    let score = board.score();
    writeln!(out, "Final score - Black: {}, White: {}", score.black, score.white)?;
    match board.winner() {
        Some(Winner::Player(p)) if p == human => writeln!(out, "You win!")?,
        Some(Winner::Player(p)) => writeln!(out, "{} (AI) wins.", p)?,
        Some(Winner::Tie) => writeln!(out, "It's a tie.")?,
        None => {}
    }

    Ok(board)
}

/// Ask until a legal move is entered. None on end of input or "quit".
fn prompt_move<B: BufRead, W: Write>(
    board: &Board,
    player: Player,
    input: &mut B,
    out: &mut W,
) -> Result<Option<Move>> {
    loop {
        write!(out, "{} to move (row col, 'moves', 'quit'): ", player)?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let line = line.trim();
        match line {
            "quit" | "q" => return Ok(None),
            "moves" | "m" => {
                let moves: Vec<String> = board
                    .valid_moves(player)
                    .iter()
                    .map(|mv| mv.to_string())
                    .collect();
                writeln!(out, "Legal moves: {}", moves.join(" "))?;
                continue;
            }
            _ => {}
        }

        match parse_move(line) {
            Some(mv) if board.is_valid_move(mv.row as usize, mv.col as usize, player) => {
                return Ok(Some(mv));
            }
            Some(mv) => writeln!(out, "Illegal move {}, try again.", mv)?,
            None => writeln!(out, "Could not read '{}', try again.", line)?,
        }
    }
}

/// Parse "r c", "r,c", "(r, c)" or algebraic "d3"
fn parse_move(input: &str) -> Option<Move> {
    let input = input.trim();

    let mut chars = input.chars();
    if let (Some(letter), Some(digit), None) = (chars.next(), chars.next(), chars.next()) {
        if letter.is_ascii_alphabetic() && digit.is_ascii_digit() {
            let col = letter.to_ascii_lowercase() as u8 - b'a';
            let row = (digit as u8 - b'0').checked_sub(1)?;
            let mv = Move::new(row, col);
            return mv.is_valid().then_some(mv);
        }
    }

    let numbers: Vec<usize> = input
        .split(|c: char| c.is_whitespace() || c == ',' || c == '(' || c == ')')
        .filter(|s| !s.is_empty())
        .map(|s| s.parse().ok())
        .collect::<Option<_>>()?;

    match numbers.as_slice() {
        &[row, col] if row < BOARD_SIZE && col < BOARD_SIZE => Some(Move::new(row as u8, col as u8)),
        _ => None,
    }
}
