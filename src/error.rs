use thiserror::Error;

use crate::memory::PairId;

/// GameError is returned by every engine operation that rejects a call. A rejected
/// call never mutates the round it was made against.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("word must be {expected} characters long, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("round is already over")]
    RoundAlreadyOver,

    #[error("a {rows}x{cols} grid cannot hold {tiles} tiles")]
    InvalidShape {
        rows: usize,
        cols: usize,
        tiles: usize,
    },

    #[error("invalid target word: {0:?}")]
    InvalidTarget(String),

    #[error("position {position} is outside the board ({tiles} tiles)")]
    InvalidPosition { position: usize, tiles: usize },

    #[error("pair {0} appears more than once")]
    DuplicatePair(PairId),

    #[error("choice {choice} is out of range ({choices} choices)")]
    InvalidChoice { choice: usize, choices: usize },

    #[error("no {0} configured")]
    EmptyList(&'static str),
}
