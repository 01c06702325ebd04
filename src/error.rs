use crate::{board::Board, moves::Move};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("Move count must be greater than 0")]
    ZeroMoveCount,
    #[error("Invalid cell count, expected {expected} cells but got {actual}")]
    WrongCellCount { expected: usize, actual: usize },
    #[error("Tile out of range, expected a value between 0 and {max} but got {tile}")]
    TileOutOfRange { tile: u32, max: u32 },
    #[error("Tile {tile} appears more than once")]
    DuplicateTile { tile: u32 },
    #[error("Board mismatch, expected a {expected} board but got {actual}")]
    BoardMismatch { expected: Board, actual: Board },
    #[error(
        "Blank is not where it was left: expected at cell {blank} (holds {found:?}), actually at {actual:?}, while applying {attempted}\n{grid}"
    )]
    CorruptedBlank {
        grid: String,
        attempted: Move,
        blank: usize,
        found: Option<u32>,
        actual: Option<usize>,
    },
    #[error("Invalid move token {token:?}, expected a direction tag followed by a count")]
    InvalidToken { token: String },
    #[error("Invalid pattern {input:?}, expected digits separated by commas or spaces")]
    InvalidPattern { input: String },
}

impl PuzzleError {
    /// Faults that indicate a bug rather than bad input.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, PuzzleError::CorruptedBlank { .. })
    }
}
