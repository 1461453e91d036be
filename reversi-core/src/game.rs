//! Game state, move legality and disc flipping

use crate::board::{offset, Move, BOARD_SIZE, DIRECTIONS, NUM_SQUARES};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// ERRORS
// ============================================================================

/// Errors raised by the rules engine and its inputs
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("illegal move at ({row}, {col})")]
    IllegalMove { row: usize, col: usize },

    #[error("malformed board: {0}")]
    MalformedBoard(String),

    #[error("invalid cell value: {0}")]
    InvalidCell(u8),

    #[error("invalid player: {0}")]
    InvalidPlayer(String),

    #[error("invalid search depth: {0}")]
    InvalidDepth(u32),

    #[error("square ({row}, {col}) is off the board")]
    OffBoard { row: usize, col: usize },

    #[error("invalid heuristics: {0}")]
    InvalidHeuristics(String),
}

// ============================================================================
// CORE TYPES
// ============================================================================

/// Player color. Black moves first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    Black = 1,
    White = 2,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }

    pub fn to_cell(self) -> Cell {
        match self {
            Player::Black => Cell::Black,
            Player::White => Cell::White,
        }
    }
}

impl TryFrom<u8> for Player {
    type Error = GameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Player::Black),
            2 => Ok(Player::White),
            other => Err(GameError::InvalidPlayer(other.to_string())),
        }
    }
}

impl FromStr for Player {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "black" | "b" | "1" => Ok(Player::Black),
            "white" | "w" | "2" => Ok(Player::White),
            _ => Err(GameError::InvalidPlayer(s.to_string())),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Black => write!(f, "Black"),
            Player::White => write!(f, "White"),
        }
    }
}

/// Contents of one square. Wire values: 0 = empty, 1 = black, 2 = white.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty = 0,
    Black = 1,
    White = 2,
}

impl Cell {
    /// Owner of this cell, if any
    pub fn player(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Black => Some(Player::Black),
            Cell::White => Some(Player::White),
        }
    }
}

impl From<Player> for Cell {
    fn from(player: Player) -> Self {
        player.to_cell()
    }
}

impl TryFrom<u8> for Cell {
    type Error = GameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Cell::Empty),
            1 => Ok(Cell::Black),
            2 => Ok(Cell::White),
            other => Err(GameError::InvalidCell(other)),
        }
    }
}

/// Disc counts, derived from a board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub black: u32,
    pub white: u32,
}

impl Score {
    pub fn of(&self, player: Player) -> u32 {
        match player {
            Player::Black => self.black,
            Player::White => self.white,
        }
    }

    pub fn total(&self) -> u32 {
        self.black + self.white
    }
}

/// Outcome of a finished game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    Player(Player),
    Tie,
}

/// Game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Ongoing,
    BlackWins,
    WhiteWins,
    Draw,
}

// ============================================================================
// BOARD
// ============================================================================

/// 8x8 board (copy to explore)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")]
pub struct Board {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Standard opening: white on (3,3) and (4,4), black on (3,4) and (4,3)
    pub fn new() -> Self {
        let mut cells = [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE];
        cells[3][3] = Cell::White;
        cells[3][4] = Cell::Black;
        cells[4][3] = Cell::Black;
        cells[4][4] = Cell::White;
        Self { cells }
    }

    /// Board with no discs
    pub fn empty() -> Self {
        Self {
            cells: [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// Board from an explicit grid (position setup)
    pub fn from_cells(cells: [[Cell; BOARD_SIZE]; BOARD_SIZE]) -> Self {
        Self { cells }
    }

    /// Parse the JSON grid form `[[0,1,2,...],...]`
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        serde_json::from_str(json).map_err(|e| GameError::MalformedBoard(e.to_string()))
    }

    /// Serialize to the JSON grid form
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    /// Cell at (row, col), None if off the board
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Overwrite one square, no capture rules applied (position setup)
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) -> Result<(), GameError> {
        let square = self
            .cells
            .get_mut(row)
            .and_then(|r| r.get_mut(col))
            .ok_or(GameError::OffBoard { row, col })?;
        *square = cell;
        Ok(())
    }

    pub fn cells(&self) -> &[[Cell; BOARD_SIZE]; BOARD_SIZE] {
        &self.cells
    }

    /// Iterate squares in row-major order
    pub fn squares(&self) -> impl Iterator<Item = (Move, Cell)> + '_ {
        self.cells.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .map(move |(c, &cell)| (Move::new(r as u8, c as u8), cell))
        })
    }

    pub fn count(&self, cell: Cell) -> u32 {
        self.cells
            .iter()
            .flatten()
            .filter(|&&c| c == cell)
            .count() as u32
    }

    pub fn score(&self) -> Score {
        Score {
            black: self.count(Cell::Black),
            white: self.count(Cell::White),
        }
    }

    /// Discs on the board, both colors
    pub fn total_pieces(&self) -> u32 {
        self.score().total()
    }

    /// Own discs minus opponent discs
    pub fn piece_difference(&self, player: Player) -> i32 {
        let score = self.score();
        score.of(player) as i32 - score.of(player.opponent()) as i32
    }

    // ========================================================================
    // MOVE LEGALITY
    // ========================================================================

    /// Number of opponent discs `player` would flip walking from (row, col)
    /// in direction (dr, dc). Zero unless the run is closed by an own disc.
    fn flips_in_direction(&self, row: usize, col: usize, dr: i8, dc: i8, player: Player) -> usize {
        let own = player.to_cell();
        let opponent = player.opponent().to_cell();

        let (mut r, mut c) = (row, col);
        let mut run = 0;

        while let Some((nr, nc)) = offset(r, c, dr, dc) {
            match self.cells[nr][nc] {
                cell if cell == opponent => run += 1,
                cell if cell == own => return run,
                _ => return 0,
            }
            r = nr;
            c = nc;
        }

        0
    }

    /// A move is valid if the square is on the board, empty, and captures in
    /// at least one of the eight directions
    pub fn is_valid_move(&self, row: usize, col: usize, player: Player) -> bool {
        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            return false;
        }
        if self.cells[row][col] != Cell::Empty {
            return false;
        }

        DIRECTIONS
            .iter()
            .any(|&(dr, dc)| self.flips_in_direction(row, col, dr, dc, player) > 0)
    }

    /// All valid moves in row-major order
    pub fn valid_moves(&self, player: Player) -> Vec<Move> {
        let mut moves = Vec::new();
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                if self.is_valid_move(row, col, player) {
                    moves.push(Move::new(row as u8, col as u8));
                }
            }
        }
        moves
    }

    /// Count valid moves (mobility heuristic)
    pub fn mobility(&self, player: Player) -> usize {
        (0..NUM_SQUARES)
            .filter(|&i| self.is_valid_move(i / BOARD_SIZE, i % BOARD_SIZE, player))
            .count()
    }

    pub fn has_valid_moves(&self, player: Player) -> bool {
        (0..NUM_SQUARES).any(|i| self.is_valid_move(i / BOARD_SIZE, i % BOARD_SIZE, player))
    }

    /// Neither side can move (a full board included)
    pub fn is_game_over(&self) -> bool {
        !self.has_valid_moves(Player::Black) && !self.has_valid_moves(Player::White)
    }

    // ========================================================================
    // APPLY MOVE
    // ========================================================================

    /// Place a disc for `player` and flip every captured run.
    /// Returns the number of flipped discs; an invalid move leaves the board
    /// untouched.
    pub fn apply_move(&mut self, row: usize, col: usize, player: Player) -> Result<u32, GameError> {
        if !self.is_valid_move(row, col, player) {
            return Err(GameError::IllegalMove { row, col });
        }

        let own = player.to_cell();
        let mut flipped = 0;

        for &(dr, dc) in &DIRECTIONS {
            let run = self.flips_in_direction(row, col, dr, dc, player);
            let (mut r, mut c) = (row, col);
            for _ in 0..run {
                // Run length was measured on-board, so every step exists
                if let Some((nr, nc)) = offset(r, c, dr, dc) {
                    self.cells[nr][nc] = own;
                    r = nr;
                    c = nc;
                    flipped += 1;
                }
            }
        }

        self.cells[row][col] = own;
        Ok(flipped)
    }

    /// Apply move, return new board
    pub fn with_move(&self, mv: Move, player: Player) -> Result<Self, GameError> {
        let mut next = *self;
        next.apply_move(mv.row as usize, mv.col as usize, player)?;
        Ok(next)
    }

    // ========================================================================
    // TURN FLOW & OUTCOME
    // ========================================================================

    /// Who moves after `just_moved` has played: the opponent if it can move,
    /// else `just_moved` again, else nobody (game over)
    pub fn next_to_move(&self, just_moved: Player) -> Option<Player> {
        let opponent = just_moved.opponent();
        if self.has_valid_moves(opponent) {
            Some(opponent)
        } else if self.has_valid_moves(just_moved) {
            Some(just_moved)
        } else {
            None
        }
    }

    /// Majority holder once the game is over; None while play continues
    pub fn winner(&self) -> Option<Winner> {
        if !self.is_game_over() {
            return None;
        }

        let score = self.score();
        Some(match score.black.cmp(&score.white) {
            std::cmp::Ordering::Greater => Winner::Player(Player::Black),
            std::cmp::Ordering::Less => Winner::Player(Player::White),
            std::cmp::Ordering::Equal => Winner::Tie,
        })
    }

    pub fn result(&self) -> GameResult {
        match self.winner() {
            None => GameResult::Ongoing,
            Some(Winner::Player(Player::Black)) => GameResult::BlackWins,
            Some(Winner::Player(Player::White)) => GameResult::WhiteWins,
            Some(Winner::Tie) => GameResult::Draw,
        }
    }
}

// ============================================================================
// SERIALIZATION
// ============================================================================

impl TryFrom<Vec<Vec<u8>>> for Board {
    type Error = GameError;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self, Self::Error> {
        if rows.len() != BOARD_SIZE {
            return Err(GameError::MalformedBoard(format!(
                "expected {} rows, got {}",
                BOARD_SIZE,
                rows.len()
            )));
        }

        let mut cells = [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE];
        for (r, row) in rows.iter().enumerate() {
            if row.len() != BOARD_SIZE {
                return Err(GameError::MalformedBoard(format!(
                    "row {} has {} cells, expected {}",
                    r,
                    row.len(),
                    BOARD_SIZE
                )));
            }
            for (c, &value) in row.iter().enumerate() {
                cells[r][c] = Cell::try_from(value)?;
            }
        }

        Ok(Self { cells })
    }
}

impl From<Board> for Vec<Vec<u8>> {
    fn from(board: Board) -> Self {
        board
            .cells
            .iter()
            .map(|row| row.iter().map(|&cell| cell as u8).collect())
            .collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " ")?;
        for col in 0..BOARD_SIZE {
            write!(f, " {}", col)?;
        }
        writeln!(f)?;

        for (r, row) in self.cells.iter().enumerate() {
            write!(f, "{}", r)?;
            for cell in row {
                let ch = match cell {
                    Cell::Empty => '.',
                    Cell::Black => 'X',
                    Cell::White => 'O',
                };
                write!(f, " {}", ch)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
