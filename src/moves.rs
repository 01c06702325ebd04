use crate::{direction::Direction, error::PuzzleError};
use std::{fmt, num::NonZeroUsize, str::FromStr};

/// A run: slide up to `count` tiles one cell in `direction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    direction: Direction,
    count: NonZeroUsize,
}

impl Move {
    pub fn new(direction: Direction, count: usize) -> Result<Self, PuzzleError> {
        let count = NonZeroUsize::new(count).ok_or(PuzzleError::ZeroMoveCount)?;
        Ok(Self { direction, count })
    }

    pub(crate) fn run(direction: Direction, count: NonZeroUsize) -> Self {
        Self { direction, count }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn count(&self) -> usize {
        self.count.get()
    }

    /// The move that undoes this one, provided this one was not clamped at a border.
    pub fn inverse(&self) -> Self {
        Self {
            direction: self.direction.inverse(),
            count: self.count,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.direction.tag(), self.count)
    }
}

impl FromStr for Move {
    type Err = PuzzleError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let invalid = || PuzzleError::InvalidToken {
            token: token.to_owned(),
        };

        let mut chars = token.chars();
        let direction = chars
            .next()
            .and_then(Direction::from_tag)
            .ok_or_else(invalid)?;
        let digits = chars.as_str();
        if !digits.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let count: usize = digits.parse().map_err(|_| invalid())?;
        Move::new(direction, count)
    }
}
