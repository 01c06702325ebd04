//! Puzzle model and solver for a robot that plays the 3x3 sliding tile puzzle.
//!
//! A scanned [`Pattern`] becomes a [`PuzzleState`], the [`Solver`] searches for a
//! [`Sequence`] of run moves back to the target, and the sequence's text form
//! (`>2 ^1 <3 v1`) is what gets sent to the robot. A [`Cursor`] replays a
//! sequence step by step.

pub mod board;
pub mod direction;
pub mod error;
pub mod moves;
pub mod puzzle;
pub mod sequence;
pub mod solver;
pub mod template;

pub use board::Board;
pub use direction::{Axis, Direction};
pub use error::PuzzleError;
pub use moves::Move;
pub use puzzle::{Pattern, PuzzleState};
pub use sequence::{Cursor, Sequence};
pub use solver::{Solver, SolverConfig, TierReport};
pub use template::Template;
