use std::path::PathBuf;

use crate::game::{Player, Pos};

/// Reasons a mutating move request is refused. The board is never changed
/// when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("column {0} is out of range")]
    InvalidColumn(usize),

    #[error("column {0} is full")]
    ColumnFull(usize),

    #[error("no column is open")]
    NoOpenColumn,

    #[error("placements must target the top row (got row {0})")]
    NotTopRow(usize),

    #[error("{} has no pieces left to place", .0.name())]
    NoPiecesLeft(Player),

    #[error("a capture chain from {0:?} must be continued")]
    MustContinueJumping(Pos),

    #[error("illegal move from {from:?} to {to:?}")]
    IllegalMove { from: Pos, to: Pos },
}

/// Errors from loading a serialized board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("state string has {actual} cells, board has {expected} enabled cells")]
    WrongLength { expected: usize, actual: usize },

    #[error("invalid cell '{ch}' at position {index}")]
    InvalidDigit { index: usize, ch: char },
}

/// Errors from whole-game queries and save/restore.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("no piece has been placed yet")]
    NothingPlaced,

    #[error("saved game is {saved_width}x{saved_height}, board is {width}x{height}")]
    BoardMismatch {
        saved_width: usize,
        saved_height: usize,
        width: usize,
        height: usize,
    },

    #[error("state error: {0}")]
    State(#[from] StateError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
