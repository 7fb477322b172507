use thiserror::Error;

use crate::WIDTH;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("invalid move string at position {position}: {reason}")]
    ParseMove { position: usize, reason: String },
    #[error("column {column} is full")]
    ColumnFull { column: usize },
    #[error("column {column} is out of bounds (0-{})", WIDTH - 1)]
    ColumnOutOfBounds { column: usize },
    #[error("no legal moves remain")]
    NoMoves,
    #[error("the game is already over")]
    GameOver,
    #[error("depth {0} is out of range (must be at least 1)")]
    DepthOutOfRange(u32),
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
}
