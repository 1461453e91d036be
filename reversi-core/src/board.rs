//! Square-grid board geometry with (row, col) coordinates

use serde::{Deserialize, Serialize};

/// Board side length
pub const BOARD_SIZE: usize = 8;

/// Number of squares on the board
pub const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;

/// A square on the board, addressed as (row, col)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub row: u8,
    pub col: u8,
}

impl Move {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Check if this square is on the board
    pub fn is_valid(&self) -> bool {
        (self.row as usize) < BOARD_SIZE && (self.col as usize) < BOARD_SIZE
    }

    /// Priority class of this square for opening play
    pub fn class(&self) -> SquareClass {
        classify(self.row as usize, self.col as usize)
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Direction vectors (drow, dcol)
/// Index: 0=NW, 1=N, 2=NE, 3=W, 4=E, 5=SW, 6=S, 7=SE
pub const DIRECTIONS: [(i8, i8); 8] = [
    (-1, -1), // NW
    (-1, 0),  // N
    (-1, 1),  // NE
    (0, -1),  // W
    (0, 1),   // E
    (1, -1),  // SW
    (1, 0),   // S
    (1, 1),   // SE
];

/// Apply a direction step to (row, col), staying on the board
pub fn offset(row: usize, col: usize, dr: i8, dc: i8) -> Option<(usize, usize)> {
    let r = row as isize + dr as isize;
    let c = col as isize + dc as isize;
    if r < 0 || c < 0 || r >= BOARD_SIZE as isize || c >= BOARD_SIZE as isize {
        return None;
    }
    Some((r as usize, c as usize))
}

/// Opening priority of a square. Ordering is priority: Corner > Edge > Other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SquareClass {
    Other,
    Edge,
    Corner,
}

fn is_border(i: usize) -> bool {
    i == 0 || i == BOARD_SIZE - 1
}

/// Squares at offset 1 from a corner along a border
fn is_next_to_corner(i: usize) -> bool {
    i == 1 || i == BOARD_SIZE - 2
}

/// Classify a square into corner, edge (excluding corner-adjacent border
/// squares) or other
pub fn classify(row: usize, col: usize) -> SquareClass {
    if is_border(row) && is_border(col) {
        return SquareClass::Corner;
    }

    let on_border = is_border(row) || is_border(col);
    let beside_corner =
        (is_border(row) && is_next_to_corner(col)) || (is_border(col) && is_next_to_corner(row));

    if on_border && !beside_corner {
        SquareClass::Edge
    } else {
        SquareClass::Other
    }
}
