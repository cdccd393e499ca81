//! Square board geometry, pieces and move generation

use std::fmt;
use std::num::{IntErrorKind, ParseIntError};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BoardError, ParseMoveError};

/// Default board size (3x3 is classic Hexapawn)
pub const DEFAULT_BOARD_SIZE: usize = 3;

/// Smallest playable board
pub const MIN_BOARD_SIZE: usize = 2;

/// Largest board whose coordinates fit comfortably in `i8`
pub const MAX_BOARD_SIZE: usize = 16;

// ============================================================================
// SIDES
// ============================================================================

/// One of the two players, by seat
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    One = 1,
    Two = 2,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::One, Side::Two];

    pub fn opponent(self) -> Self {
        match self {
            Side::One => Side::Two,
            Side::Two => Side::One,
        }
    }

    /// Row delta of a forward step. Player one starts at the bottom.
    pub fn forward(self) -> i8 {
        match self {
            Side::One => -1,
            Side::Two => 1,
        }
    }

    /// The row this side's pieces start on
    pub fn home_row(self, size: usize) -> i8 {
        match self {
            Side::One => size as i8 - 1,
            Side::Two => 0,
        }
    }

    /// Seat number, 1 or 2
    pub fn number(self) -> u8 {
        self as u8
    }

    /// Zero-based seat index
    pub fn index(self) -> usize {
        self as usize - 1
    }

    fn digit(self) -> char {
        match self {
            Side::One => '1',
            Side::Two => '2',
        }
    }

    fn from_digit(c: char) -> Option<Option<Side>> {
        match c {
            '0' => Some(None),
            '1' => Some(Some(Side::One)),
            '2' => Some(Some(Side::Two)),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.number())
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" | "one" => Ok(Side::One),
            "2" | "two" => Ok(Side::Two),
            other => Err(format!("unknown side {:?} (expected 1 or 2)", other)),
        }
    }
}

// ============================================================================
// POSITIONS AND MOVES
// ============================================================================

/// Board coordinates, row 0 at the top
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: i8,
    pub col: i8,
}

impl Position {
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    /// Check if this position is on a board of the given size
    pub fn in_bounds(&self, size: usize) -> bool {
        self.row >= 0 && self.col >= 0 && (self.row as usize) < size && (self.col as usize) < size
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A piece relocation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Position,
    pub to: Position,
}

impl Move {
    pub const fn new(from: Position, to: Position) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// Parses `from_row,from_col,to_row,to_col`
impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(ParseMoveError::WrongTokenCount(parts.len()));
        }

        let mut coords = [0i8; 4];
        for (slot, part) in coords.iter_mut().zip(&parts) {
            *slot = part.parse::<i8>().map_err(|err: ParseIntError| match err.kind() {
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                    ParseMoveError::OutOfRange(part.to_string())
                }
                _ => ParseMoveError::NotANumber(part.to_string()),
            })?;
        }

        Ok(Move::new(
            Position::new(coords[0], coords[1]),
            Position::new(coords[2], coords[3]),
        ))
    }
}

// ============================================================================
// BOARD
// ============================================================================

/// Square Hexapawn board (clone for lookahead)
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    /// Row-major cells
    cells: Vec<Option<Side>>,
}

impl Default for Board {
    fn default() -> Self {
        Self::starting(DEFAULT_BOARD_SIZE)
    }
}

impl Board {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Create a starting board: player two fills the top row, player one the bottom
    pub fn new(size: usize) -> Result<Self, BoardError> {
        check_size(size)?;
        Ok(Self::starting(size))
    }

    fn starting(size: usize) -> Self {
        let mut cells = vec![None; size * size];
        for col in 0..size {
            cells[col] = Some(Side::Two);
            cells[(size - 1) * size + col] = Some(Side::One);
        }
        Self { size, cells }
    }

    /// Rebuild a board from its digit string
    pub fn deserialize(s: &str, size: usize) -> Result<Self, BoardError> {
        check_size(size)?;

        let chars: Vec<char> = s.chars().collect();
        let expected = size * size;
        if chars.len() != expected {
            return Err(BoardError::InvalidLength {
                size,
                expected,
                actual: chars.len(),
            });
        }

        let cells = chars
            .iter()
            .enumerate()
            .map(|(index, &c)| Side::from_digit(c).ok_or(BoardError::InvalidCell { index, found: c }))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { size, cells })
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_valid_position(&self, pos: Position) -> bool {
        pos.in_bounds(self.size)
    }

    /// Occupant of a square (None when empty or off the board)
    pub fn get_piece(&self, pos: Position) -> Option<Side> {
        self.index(pos).and_then(|i| self.cells[i])
    }

    /// Squares held by `side`, row-major
    pub fn get_player_positions(&self, side: Side) -> Vec<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell == Some(side))
            .map(|(i, _)| self.position_of(i))
            .collect()
    }

    /// Whether any piece of `side` stands on the opponent's home row
    pub fn is_promoted(&self, side: Side) -> bool {
        let target = side.opponent().home_row(self.size);
        self.get_player_positions(side)
            .iter()
            .any(|pos| pos.row == target)
    }

    // ========================================================================
    // MUTATION
    // ========================================================================

    /// Relocate whatever is on `from` to `to`, capturing any occupant.
    /// Legality is the caller's concern; off-board squares make this a no-op.
    pub fn move_piece(&mut self, from: Position, to: Position) {
        if let (Some(src), Some(dst)) = (self.index(from), self.index(to)) {
            self.cells[dst] = self.cells[src];
            self.cells[src] = None;
        }
    }

    // ========================================================================
    // MOVE GENERATION
    // ========================================================================

    /// Legal moves for `side`: per piece, diagonal-left capture, forward step,
    /// diagonal-right capture (left and right as seen by the mover)
    pub fn get_legal_moves(&self, side: Side) -> Vec<Move> {
        let dr = side.forward();
        let mut moves = Vec::new();

        for from in self.get_player_positions(side) {
            for dc in [dr, 0, -dr] {
                let to = Position::new(from.row + dr, from.col + dc);
                if !self.is_valid_position(to) {
                    continue;
                }

                let target = self.get_piece(to);
                let legal = if dc == 0 {
                    target.is_none()
                } else {
                    target == Some(side.opponent())
                };

                if legal {
                    moves.push(Move::new(from, to));
                }
            }
        }

        moves
    }

    // ========================================================================
    // ENCODING
    // ========================================================================

    /// Row-major digit string: `0` empty, `1`/`2` player pieces
    pub fn serialize(&self) -> String {
        self.cells
            .iter()
            .map(|cell| cell.map_or('0', Side::digit))
            .collect()
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if self.is_valid_position(pos) {
            Some(pos.row as usize * self.size + pos.col as usize)
        } else {
            None
        }
    }

    fn position_of(&self, index: usize) -> Position {
        Position::new((index / self.size) as i8, (index % self.size) as i8)
    }
}

fn check_size(size: usize) -> Result<(), BoardError> {
    if (MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
        Ok(())
    } else {
        Err(BoardError::InvalidSize(size))
    }
}

/// Grid with row and column headers
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for col in 0..self.size {
            write!(f, " {:>2}", col)?;
        }
        writeln!(f)?;

        for (row, cells) in self.cells.chunks(self.size).enumerate() {
            write!(f, "{:>2} ", row)?;
            for cell in cells {
                write!(f, " {:>2}", cell.map_or('0', Side::digit))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
