//! CPU-based Alpha-Beta AI

use crate::board::Move;
use crate::config::AiConfig;
use crate::eval::{evaluate, Heuristics};
use crate::game::{Board, GameError, Player};
use crate::opening::opening_move;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

// ============================================================================
// SEARCH RESULT
// ============================================================================

/// How a move was chosen
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    /// Square-class heuristic, no search
    Opening,
    /// Minimax with alpha-beta pruning
    Search,
    /// No legal move; the turn passes
    Pass,
}

/// Outcome of a move selection
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    /// Minimax value of `best_move` (search only)
    pub score: Option<i32>,
    pub strategy: Strategy,
    /// Positions visited by the search
    pub nodes: u64,
}

impl SearchResult {
    fn pass() -> Self {
        Self {
            best_move: None,
            score: None,
            strategy: Strategy::Pass,
            nodes: 0,
        }
    }
}

// ============================================================================
// ALPHA-BETA AI
// ============================================================================

/// Alpha-Beta AI player
pub struct AlphaBetaAI {
    pub config: AiConfig,
    rng: ChaCha8Rng,
}

impl AlphaBetaAI {
    /// Seeded from `config.seed`, or from entropy when unset
    pub fn new(config: AiConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self { config, rng }
    }

    pub fn with_seed(config: AiConfig, seed: u64) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Get best move for `player`, None if it has to pass
    pub fn best_move(&mut self, board: &Board, player: Player) -> Option<Move> {
        self.search(board, player).best_move
    }

    /// Select a move and report how it was found
    pub fn search(&mut self, board: &Board, player: Player) -> SearchResult {
        select_move(board, player, &self.config, &mut self.rng)
    }

    /// Evaluate a position
    pub fn evaluate(&self, board: &Board, player: Player) -> i32 {
        evaluate(board, player, &self.config.heuristics)
    }

    /// Play a complete game with this AI on both sides
    pub fn play_game(
        &mut self,
        initial: Board,
        first: Player,
    ) -> Result<(Board, Vec<(Player, Move)>), GameError> {
        let mut board = initial;
        let mut history = Vec::new();

        // `first` moves if it can, otherwise its opponent opens
        let mut to_move = board.next_to_move(first.opponent());

        while let Some(player) = to_move {
            let Some(mv) = self.best_move(&board, player) else {
                break;
            };
            board.apply_move(mv.row as usize, mv.col as usize, player)?;
            history.push((player, mv));
            to_move = board.next_to_move(player);
        }

        Ok((board, history))
    }
}

// ============================================================================
// MOVE SELECTION
// ============================================================================

/// Recommended move for `player`, or None when it has no legal move
pub fn best_move<R: Rng + ?Sized>(
    board: &Board,
    player: Player,
    config: &AiConfig,
    rng: &mut R,
) -> Option<Move> {
    select_move(board, player, config, rng).best_move
}

/// Choose between the opening heuristic and full search by disc count
pub fn select_move<R: Rng + ?Sized>(
    board: &Board,
    player: Player,
    config: &AiConfig,
    rng: &mut R,
) -> SearchResult {
    let moves = board.valid_moves(player);
    if moves.is_empty() {
        return SearchResult::pass();
    }

    if board.total_pieces() < config.opening_threshold {
        return SearchResult {
            best_move: opening_move(&moves, rng),
            score: None,
            strategy: Strategy::Opening,
            nodes: 0,
        };
    }

    search_root(board, player, config.depth, &config.heuristics)
}

/// Score every root move with alpha-beta at `depth - 1` and keep the first
/// strictly best one. `depth` counts the root move itself and must be at
/// least 1 (see [`AiConfig::validate`]).
pub fn search_root(board: &Board, player: Player, depth: u32, heuristics: &Heuristics) -> SearchResult {
    debug_assert!(depth >= 1, "search depth must be at least 1");

    let mut nodes = 0;
    let mut best: Option<(Move, i32)> = None;

    for mv in board.valid_moves(player) {
        let child = play(board, mv, player);
        let score = alpha_beta(
            &child,
            depth.saturating_sub(1),
            false,
            player,
            i32::MIN,
            i32::MAX,
            heuristics,
            &mut nodes,
        );

        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((mv, score));
        }
    }

    match best {
        Some((mv, score)) => SearchResult {
            best_move: Some(mv),
            score: Some(score),
            strategy: Strategy::Search,
            nodes,
        },
        None => SearchResult::pass(),
    }
}

// ============================================================================
// MINIMAX WITH ALPHA-BETA
// ============================================================================

/// Minimax value of `board` for `root_player`. `maximizing` says whether
/// `root_player` is the side to move.
pub fn minimax(
    board: &Board,
    depth: u32,
    maximizing: bool,
    root_player: Player,
    alpha: i32,
    beta: i32,
    heuristics: &Heuristics,
) -> i32 {
    let mut nodes = 0;
    alpha_beta(board, depth, maximizing, root_player, alpha, beta, heuristics, &mut nodes)
}

#[allow(clippy::too_many_arguments)]
fn alpha_beta(
    board: &Board,
    depth: u32,
    maximizing: bool,
    root_player: Player,
    mut alpha: i32,
    mut beta: i32,
    heuristics: &Heuristics,
    nodes: &mut u64,
) -> i32 {
    *nodes += 1;

    // Leaves are always scored from the root player's side
    if depth == 0 || board.is_game_over() {
        return evaluate(board, root_player, heuristics);
    }

    let side = if maximizing {
        root_player
    } else {
        root_player.opponent()
    };

    let moves = board.valid_moves(side);

    // Forced pass spends a ply
    if moves.is_empty() {
        return alpha_beta(board, depth - 1, !maximizing, root_player, alpha, beta, heuristics, nodes);
    }

    if maximizing {
        let mut best = i32::MIN;
        for mv in moves {
            let child = play(board, mv, side);
            let score = alpha_beta(&child, depth - 1, false, root_player, alpha, beta, heuristics, nodes);
            best = best.max(score);
            alpha = alpha.max(score);
            if beta <= alpha {
                break;
            }
        }
        best
    } else {
        let mut best = i32::MAX;
        for mv in moves {
            let child = play(board, mv, side);
            let score = alpha_beta(&child, depth - 1, true, root_player, alpha, beta, heuristics, nodes);
            best = best.min(score);
            beta = beta.min(score);
            if beta <= alpha {
                break;
            }
        }
        best
    }
}

/// Private copy of `board` with a generated move applied
fn play(board: &Board, mv: Move, player: Player) -> Board {
    board
        .with_move(mv, player)
        .expect("generated moves are legal")
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{SquareClass, BOARD_SIZE};
    use crate::game::Cell;

    /// Plain minimax without pruning, same pass accounting
    fn full_width(board: &Board, depth: u32, maximizing: bool, root: Player, h: &Heuristics) -> i32 {
        if depth == 0 || board.is_game_over() {
            return evaluate(board, root, h);
        }
        let side = if maximizing { root } else { root.opponent() };
        let moves = board.valid_moves(side);
        if moves.is_empty() {
            return full_width(board, depth - 1, !maximizing, root, h);
        }
        let scores = moves
            .into_iter()
            .map(|mv| full_width(&play(board, mv, side), depth - 1, !maximizing, root, h));
        if maximizing {
            scores.max().unwrap()
        } else {
            scores.min().unwrap()
        }
    }

    fn full_width_root(board: &Board, player: Player, depth: u32, h: &Heuristics) -> Option<(Move, i32)> {
        let mut best: Option<(Move, i32)> = None;
        for mv in board.valid_moves(player) {
            let score = full_width(&play(board, mv, player), depth - 1, false, player, h);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((mv, score));
            }
        }
        best
    }

    /// Random legal playout of `plies` moves from the opening
    fn random_position(rng: &mut ChaCha8Rng, plies: usize) -> (Board, Option<Player>) {
        let mut board = Board::new();
        let mut to_move = Some(Player::Black);
        for _ in 0..plies {
            let Some(player) = to_move else { break };
            let moves = board.valid_moves(player);
            let mv = *moves.choose(rng).unwrap();
            board = play(&board, mv, player);
            to_move = board.next_to_move(player);
        }
        (board, to_move)
    }

    fn stalled_board() -> Board {
        // Black has no move, white still does
        let mut board = Board::empty();
        for (r, c, cell) in [
            (0, 0, Cell::White),
            (0, 1, Cell::White),
            (0, 2, Cell::White),
            (7, 7, Cell::White),
            (6, 7, Cell::Black),
        ] {
            board.set(r, c, cell).unwrap();
        }
        board
    }

    #[test]
    fn test_depth_zero_is_evaluate() {
        let h = Heuristics::default();
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        for plies in [0, 5, 17, 30] {
            let (board, _) = random_position(&mut rng, plies);
            for root in [Player::Black, Player::White] {
                for maximizing in [true, false] {
                    assert_eq!(
                        minimax(&board, 0, maximizing, root, i32::MIN, i32::MAX, &h),
                        evaluate(&board, root, &h)
                    );
                }
            }
        }
    }

    #[test]
    fn test_game_over_is_evaluate() {
        let h = Heuristics::default();
        let board = Board::from_cells([[Cell::White; BOARD_SIZE]; BOARD_SIZE]);
        assert_eq!(
            minimax(&board, 4, true, Player::Black, i32::MIN, i32::MAX, &h),
            evaluate(&board, Player::Black, &h)
        );
    }

    #[test]
    fn test_forced_pass_spends_ply() {
        let h = Heuristics::default();
        let board = stalled_board();
        assert!(!board.has_valid_moves(Player::Black));
        assert!(board.has_valid_moves(Player::White));

        // Black to move at depth 1 can only pass, which exhausts the budget
        assert_eq!(
            minimax(&board, 1, true, Player::Black, i32::MIN, i32::MAX, &h),
            evaluate(&board, Player::Black, &h)
        );
        // At depth 2 the pass hands white exactly one ply
        assert_eq!(
            minimax(&board, 2, true, Player::Black, i32::MIN, i32::MAX, &h),
            full_width(&board, 2, true, Player::Black, &h)
        );
    }

    #[test]
    fn test_pruning_matches_full_width() {
        let h = Heuristics::default();
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let mut checked = 0;

        for _ in 0..40 {
            let plies = rng.gen_range(16..40);
            let (board, to_move) = random_position(&mut rng, plies);
            let Some(player) = to_move else { continue };

            let pruned = search_root(&board, player, 3, &h);
            let (mv, score) = full_width_root(&board, player, 3, &h).unwrap();

            assert_eq!(pruned.best_move, Some(mv));
            assert_eq!(pruned.score, Some(score));
            checked += 1;
        }

        assert!(checked > 20);
    }

    #[test]
    fn test_pruning_visits_fewer_nodes() {
        let h = Heuristics::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let (board, to_move) = random_position(&mut rng, 24);
        let player = to_move.unwrap();

        let result = search_root(&board, player, 4, &h);

        fn count(board: &Board, depth: u32, maximizing: bool, root: Player) -> u64 {
            if depth == 0 || board.is_game_over() {
                return 1;
            }
            let side = if maximizing { root } else { root.opponent() };
            let moves = board.valid_moves(side);
            if moves.is_empty() {
                return 1 + count(board, depth - 1, !maximizing, root);
            }
            1 + moves
                .into_iter()
                .map(|mv| count(&play(board, mv, side), depth - 1, !maximizing, root))
                .sum::<u64>()
        }

        let full: u64 = board
            .valid_moves(player)
            .into_iter()
            .map(|mv| count(&play(&board, mv, player), 3, false, player))
            .sum();

        assert!(result.nodes > 0);
        assert!(result.nodes <= full);
    }

    #[test]
    fn test_no_moves_returns_none() {
        let board = stalled_board();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let config = AiConfig::default();

        assert_eq!(best_move(&board, Player::Black, &config, &mut rng), None);
        let result = select_move(&board, Player::Black, &config, &mut rng);
        assert_eq!(result.strategy, Strategy::Pass);

        // Same board in the search phase
        let search_config = AiConfig {
            opening_threshold: 0,
            ..AiConfig::default()
        };
        assert_eq!(best_move(&board, Player::Black, &search_config, &mut rng), None);
        assert!(best_move(&board, Player::White, &search_config, &mut rng).is_some());
    }

    #[test]
    fn test_opening_phase_takes_corner() {
        // White can take (0,0) by closing the diagonal through (1,1)
        let mut board = Board::new();
        board.set(1, 1, Cell::Black).unwrap();
        board.set(2, 2, Cell::White).unwrap();
        assert!(board.is_valid_move(0, 0, Player::White));

        let config = AiConfig::default();
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let result = select_move(&board, Player::White, &config, &mut rng);
            assert_eq!(result.strategy, Strategy::Opening);
            assert_eq!(result.best_move.map(|m| m.class()), Some(SquareClass::Corner));
        }
    }

    #[test]
    fn test_search_phase_is_deterministic() {
        let mut rng = ChaCha8Rng::seed_from_u64(77);
        let (board, to_move) = random_position(&mut rng, 20);
        let player = to_move.unwrap();
        assert!(board.total_pieces() >= 20);

        let config = AiConfig::default().with_depth(3);
        let a = select_move(&board, player, &config, &mut ChaCha8Rng::seed_from_u64(1));
        let b = select_move(&board, player, &config, &mut ChaCha8Rng::seed_from_u64(2));
        assert_eq!(a.strategy, Strategy::Search);
        assert_eq!(a, b);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "search depth must be at least 1")]
    fn test_search_root_rejects_zero_depth() {
        search_root(&Board::new(), Player::Black, 0, &Heuristics::default());
    }

    #[test]
    fn test_first_move_wins_ties() {
        // Zeroed heuristics score every position 0, so the first root move wins
        let h = Heuristics {
            position_weights: [[0; BOARD_SIZE]; BOARD_SIZE],
            mobility_weight: 0,
        };
        let board = Board::new();
        let result = search_root(&board, Player::Black, 2, &h);
        assert_eq!(result.best_move, Some(Move::new(2, 3)));
        assert_eq!(result.score, Some(0));
    }

    #[test]
    fn test_search_takes_winning_corner() {
        // (0,0) takes the corner by flipping (0,1); the row 5 replies only
        // gain a few edge points
        let mut board = Board::empty();
        for c in 0..BOARD_SIZE {
            board.set(3, c, Cell::Black).unwrap();
            board.set(4, c, Cell::White).unwrap();
        }
        board.set(0, 1, Cell::White).unwrap();
        board.set(0, 2, Cell::Black).unwrap();
        board.set(2, 3, Cell::Black).unwrap();
        board.set(2, 4, Cell::Black).unwrap();
        assert!(board.total_pieces() >= 20);
        assert!(board.is_valid_move(0, 0, Player::Black));

        let mut ai = AlphaBetaAI::with_seed(AiConfig::default().with_depth(1), 3);
        assert_eq!(ai.best_move(&board, Player::Black), Some(Move::new(0, 0)));
    }

    #[test]
    fn test_play_game() {
        let mut ai = AlphaBetaAI::with_seed(AiConfig::default().with_depth(2), 42);
        let (final_board, history) = ai.play_game(Board::new(), Player::Black).unwrap();

        assert!(final_board.is_game_over());
        assert!(final_board.winner().is_some());
        assert!(!history.is_empty());
        assert_eq!(history[0].0, Player::Black);

        // History replays to the same board
        let mut replay = Board::new();
        for &(player, mv) in &history {
            replay.apply_move(mv.row as usize, mv.col as usize, player).unwrap();
        }
        assert_eq!(replay, final_board);
        assert_eq!(final_board.total_pieces() as usize, 4 + history.len());
    }

    #[test]
    fn test_ai_evaluate() {
        let ai = AlphaBetaAI::with_seed(AiConfig::default(), 1);
        assert_eq!(ai.evaluate(&Board::new(), Player::Black), 0);
    }
}
