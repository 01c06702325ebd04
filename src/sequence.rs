use crate::{error::PuzzleError, moves::Move, puzzle::PuzzleState};
use itertools::Itertools;
use rand::Rng;
use std::{fmt, slice, str::FromStr};

/// Moves in the order they are carried out. Its text form is what the robot
/// consumes: tokens like `>2` separated by single spaces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Sequence {
    moves: Vec<Move>,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// `length` random runs starting from `start`, alternating axes as the
    /// solver does.
    pub fn random<R: Rng + ?Sized>(
        start: &PuzzleState,
        length: usize,
        rng: &mut R,
    ) -> Result<Self, PuzzleError> {
        let mut state = start.clone();
        let mut moves: Vec<Move> = Vec::with_capacity(length);
        for _ in 0..length {
            let next = state.random_move(moves.last(), rng);
            state.apply(&next)?;
            moves.push(next);
        }
        Ok(Self { moves })
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn push(&mut self, step: Move) {
        self.moves.push(step);
    }

    pub fn iter(&self) -> slice::Iter<'_, Move> {
        self.moves.iter()
    }

    /// Undoes `self` when applied after it.
    #[must_use]
    pub fn invert(&self) -> Self {
        Self {
            moves: self.moves.iter().rev().map(Move::inverse).collect(),
        }
    }

    /// `self` followed by `other`.
    #[must_use]
    pub fn then(&self, other: &Sequence) -> Self {
        Self {
            moves: self.moves.iter().chain(&other.moves).copied().collect(),
        }
    }

    pub fn apply(&self, state: &mut PuzzleState) -> Result<(), PuzzleError> {
        for step in &self.moves {
            state.apply(step)?;
        }
        Ok(())
    }
}

impl From<Vec<Move>> for Sequence {
    fn from(moves: Vec<Move>) -> Self {
        Self { moves }
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a Move;
    type IntoIter = slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.moves.iter().join(" "))
    }
}

impl FromStr for Sequence {
    type Err = PuzzleError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        text.split_whitespace()
            .map(str::parse)
            .collect::<Result<Vec<Move>, _>>()
            .map(Sequence::from)
    }
}

/// Replays a sequence one move at a time on its own copy of the start state.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    sequence: &'a Sequence,
    state: PuzzleState,
    index: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(sequence: &'a Sequence, start: &PuzzleState) -> Self {
        Self {
            sequence,
            state: start.clone(),
            index: 0,
        }
    }

    pub fn has_next(&self) -> bool {
        self.index < self.sequence.len()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current_state(&self) -> &PuzzleState {
        &self.state
    }

    /// The move the next [`Self::advance`] applies.
    pub fn current_move(&self) -> Option<&Move> {
        self.sequence.moves().get(self.index)
    }

    /// Applies the next move. Does nothing once the sequence is exhausted.
    pub fn advance(&mut self) -> Result<(), PuzzleError> {
        let Some(step) = self.sequence.moves().get(self.index) else {
            return Ok(());
        };
        self.state.apply(step)?;
        self.index += 1;
        Ok(())
    }

    /// Plays the remaining moves and hands back the final state.
    pub fn finish(mut self) -> Result<PuzzleState, PuzzleError> {
        while self.has_next() {
            self.advance()?;
        }
        Ok(self.state)
    }

    /// The current grid with the upcoming move marked, optionally preceded by
    /// the sequence text and a caret under the upcoming token.
    pub fn render(&self, hide_sequence: bool) -> String {
        let mut result = String::new();

        if !hide_sequence {
            result.push_str(&self.sequence.to_string());
            result.push('\n');
            if self.has_next() {
                let column: usize = self.sequence.moves()[..self.index]
                    .iter()
                    .map(|step| step.to_string().len() + 1)
                    .sum();
                result.push_str(&" ".repeat(column));
                result.push('^');
            }
            result.push_str("\n\n");
        }

        result.push_str(&self.state.render(self.current_move()));
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::Direction;
    use rand::{rngs::StdRng, SeedableRng};

    fn step(direction: Direction, count: usize) -> Move {
        Move::new(direction, count).unwrap()
    }

    #[test]
    fn text_protocol() {
        let sequence = Sequence::from(vec![
            step(Direction::Right, 2),
            step(Direction::Up, 1),
            step(Direction::Left, 3),
            step(Direction::Down, 1),
        ]);
        assert_eq!(sequence.to_string(), ">2 ^1 <3 v1");
        assert_eq!(">2 ^1 <3 v1".parse::<Sequence>(), Ok(sequence));
        assert_eq!("  >2\t^1\n".parse::<Sequence>().map(|s| s.len()), Ok(2));

        assert_eq!(Sequence::new().to_string(), "");
        assert_eq!("".parse::<Sequence>(), Ok(Sequence::new()));
        assert!(">2 ?1".parse::<Sequence>().is_err());
    }

    #[test]
    fn invert_reverses_and_inverts() {
        let sequence: Sequence = ">2 ^1 <1".parse().unwrap();
        assert_eq!(sequence.invert().to_string(), ">1 v1 <2");
        assert_eq!(sequence.invert().invert(), sequence);
    }

    #[test]
    fn then_concatenates() {
        let first: Sequence = "v2 >2".parse().unwrap();
        let second: Sequence = "^1".parse().unwrap();
        assert_eq!(first.then(&second).to_string(), "v2 >2 ^1");
        assert_eq!(first.then(&Sequence::new()), first);
    }

    #[test]
    fn random_sequences_are_undone_by_their_inverse() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let start = PuzzleState::default();
            let sequence = Sequence::random(&start, 5, &mut rng).unwrap();
            assert_eq!(sequence.len(), 5);

            let mut puzzle = start.clone();
            sequence.apply(&mut puzzle).unwrap();
            sequence.invert().apply(&mut puzzle).unwrap();
            assert_eq!(puzzle, start, "{sequence}");
        }
    }

    #[test]
    fn cursor_steps_through_a_sequence() {
        let sequence: Sequence = "v2 >2".parse().unwrap();
        let start = PuzzleState::default();
        let mut cursor = Cursor::new(&sequence, &start);

        assert!(cursor.has_next());
        assert_eq!(cursor.current_move(), Some(&step(Direction::Down, 2)));
        cursor.advance().unwrap();
        assert_eq!(
            cursor.current_state().tiles(),
            &[1, 2, 0, 4, 5, 3, 7, 8, 6]
        );
        cursor.advance().unwrap();
        assert!(!cursor.has_next());
        assert_eq!(cursor.current_move(), None);
        assert_eq!(
            cursor.current_state().tiles(),
            &[0, 1, 2, 4, 5, 3, 7, 8, 6]
        );

        cursor.advance().unwrap();
        assert_eq!(cursor.index(), 2);
        assert_eq!(start, PuzzleState::default());
    }

    #[test]
    fn cursor_render_points_at_the_next_move() {
        let sequence: Sequence = "v2 >2 ^1".parse().unwrap();
        let start = PuzzleState::default();
        let mut cursor = Cursor::new(&sequence, &start);
        cursor.advance().unwrap();

        let rendered = cursor.render(false);
        let mut lines = rendered.lines();
        assert_eq!(lines.next(), Some("v2 >2 ^1"));
        assert_eq!(lines.next(), Some("   ^"));
        assert!(rendered.contains('x'));

        let finished = cursor.clone().finish().unwrap();
        assert_eq!(finished.tiles(), &[4, 1, 2, 0, 5, 3, 7, 8, 6]);
        assert!(!cursor.render(true).starts_with("v2"));
    }
}
