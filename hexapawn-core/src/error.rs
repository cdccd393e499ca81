//! Structured error types

use std::path::PathBuf;

use crate::board::{Move, Position};

/// Errors raised when building a board from its string encoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("board string has {actual} cells, expected {expected} for a {size}x{size} board")]
    InvalidLength {
        size: usize,
        expected: usize,
        actual: usize,
    },

    #[error("invalid cell {found:?} at index {index} (expected '0', '1' or '2')")]
    InvalidCell { index: usize, found: char },

    #[error("board size {0} is out of range")]
    InvalidSize(usize),
}

/// Errors raised when parsing a typed move such as `2,1,1,1`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseMoveError {
    #[error("expected 4 comma separated numbers, got {0}")]
    WrongTokenCount(usize),

    #[error("{0:?} is not a number")]
    NotANumber(String),

    #[error("{0} is too large to be a board coordinate")]
    OutOfRange(String),
}

/// Errors raised by a move-selection strategy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StrategyError {
    #[error("no legal moves available")]
    NoLegalMoves,

    #[error("position {0} is outside the board")]
    OffBoard(Position),

    #[error("strategy failed: {0}")]
    Failed(String),
}

impl StrategyError {
    /// Check that both ends of a move lie on a board of the given size.
    pub fn check_move(mv: Move, size: usize) -> Result<Move, StrategyError> {
        for pos in [mv.from, mv.to] {
            if !pos.in_bounds(size) {
                return Err(StrategyError::OffBoard(pos));
            }
        }
        Ok(mv)
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unknown strategy {0:?} (expected first, random or greedy)")]
    UnknownStrategy(String),

    #[error("invalid initial board: {0}")]
    Board(#[from] BoardError),

    #[error("config validation error: {0}")]
    Validation(String),
}
