//! Reversi Core - Rules engine and AI
//!
//! This crate provides the core game logic for Reversi:
//! - Board geometry (8x8 grid, scan directions, square classes)
//! - Board state, move legality and disc flipping
//! - Position evaluation with positional weights and mobility
//! - Opening move heuristic
//! - CPU-based alpha-beta AI
//!
//! The crate performs no I/O; callers own persistence, turn order across
//! requests and presentation.

pub mod board;
pub mod game;
pub mod eval;
pub mod opening;
pub mod ai;
pub mod config;

// Re-exports for convenient access
pub use board::{Move, SquareClass, BOARD_SIZE, DIRECTIONS};
pub use game::{Board, Cell, GameError, GameResult, Player, Score, Winner};
pub use eval::{evaluate, Heuristics, MAX_EVAL, POSITION_WEIGHTS};
pub use opening::opening_move;
pub use ai::{best_move, minimax, select_move, AlphaBetaAI, SearchResult, Strategy};
pub use config::{AiConfig, MAX_DEPTH, OPENING_THRESHOLD};
