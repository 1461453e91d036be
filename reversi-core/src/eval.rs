//! Position evaluation

use crate::board::{BOARD_SIZE, NUM_SQUARES};
use crate::game::{Board, Cell, GameError, Player};
use serde::{Deserialize, Serialize};

/// Positional weight of each square. Corners are prized, the squares that
/// hand a corner to the opponent are penalized.
pub const POSITION_WEIGHTS: [[i32; BOARD_SIZE]; BOARD_SIZE] = [
    [100, -20, 10, 5, 5, 10, -20, 100],
    [-20, -50, -2, -2, -2, -2, -50, -20],
    [10, -2, -1, -1, -1, -1, -2, 10],
    [5, -2, -1, -1, -1, -1, -2, 5],
    [5, -2, -1, -1, -1, -1, -2, 5],
    [10, -2, -1, -1, -1, -1, -2, 10],
    [-20, -50, -2, -2, -2, -2, -50, -20],
    [100, -20, 10, 5, 5, 10, -20, 100],
];

/// Weight applied to the legal-move difference
pub const MOBILITY_WEIGHT: i32 = 5;

/// Largest evaluation magnitude accepted from custom heuristics. Stays
/// strictly inside the `i32::MIN..=i32::MAX` search window.
pub const MAX_EVAL: i64 = i32::MAX as i64 - 1;

/// Heuristic weights for position evaluation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Heuristics {
    /// Value of owning each square
    pub position_weights: [[i32; BOARD_SIZE]; BOARD_SIZE],
    /// Weight for mobility (legal move count)
    pub mobility_weight: i32,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            position_weights: POSITION_WEIGHTS,
            mobility_weight: MOBILITY_WEIGHT,
        }
    }
}

impl Heuristics {
    /// Upper bound on `|evaluate(..)|`: each square counts once and neither
    /// side has more legal moves than there are squares
    pub fn score_bound(&self) -> i64 {
        let max_weight = self
            .position_weights
            .iter()
            .flatten()
            .map(|w| w.unsigned_abs() as i64)
            .max()
            .unwrap_or(0);
        NUM_SQUARES as i64 * (max_weight + self.mobility_weight.unsigned_abs() as i64)
    }

    /// Reject weights whose evaluation could overflow `i32`
    pub fn validate(&self) -> Result<(), GameError> {
        let bound = self.score_bound();
        if bound > MAX_EVAL {
            return Err(GameError::InvalidHeuristics(format!(
                "evaluation could reach {}, limit is {}",
                bound, MAX_EVAL
            )));
        }
        Ok(())
    }
}

/// Evaluate position from `player`'s perspective.
/// `heuristics` must pass [`Heuristics::validate`].
pub fn evaluate(board: &Board, player: Player, heuristics: &Heuristics) -> i32 {
    let own = player.to_cell();
    let opponent = player.opponent();

    let mut score = 0;

    for (r, row) in board.cells().iter().enumerate() {
        for (c, &cell) in row.iter().enumerate() {
            if cell == Cell::Empty {
                continue;
            }
            let weight = heuristics.position_weights[r][c];
            if cell == own {
                score += weight;
            } else {
                score -= weight;
            }
        }
    }

    // Mobility evaluation
    if heuristics.mobility_weight != 0 {
        let my_mobility = board.mobility(player) as i32;
        let opp_mobility = board.mobility(opponent) as i32;
        score += heuristics.mobility_weight * (my_mobility - opp_mobility);
    }

    score
}
