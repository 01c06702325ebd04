use crate::{
    board::Board,
    direction::{Axis, Direction},
    error::PuzzleError,
    moves::Move,
};
use log::error;
use rand::Rng;
use std::{fmt, num::NonZeroUsize, str::FromStr};

/// The value of the cell without a tile.
pub const BLANK: u32 = 0;

/// A tile arrangement as reported by the scanner, row-major, `0` for the blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern(Vec<u32>);

impl Pattern {
    pub fn new(tiles: Vec<u32>) -> Self {
        Self(tiles)
    }

    pub fn tiles(&self) -> &[u32] {
        &self.0
    }

    /// Checks that the pattern is a permutation of `0..board.cells()`.
    pub fn validate(&self, board: Board) -> Result<(), PuzzleError> {
        let cells = board.cells();
        if self.0.len() != cells {
            return Err(PuzzleError::WrongCellCount {
                expected: cells,
                actual: self.0.len(),
            });
        }

        let mut seen = vec![false; cells];
        for &tile in &self.0 {
            let slot = seen
                .get_mut(tile as usize)
                .ok_or(PuzzleError::TileOutOfRange {
                    tile,
                    max: cells as u32 - 1,
                })?;
            if *slot {
                return Err(PuzzleError::DuplicateTile { tile });
            }
            *slot = true;
        }
        Ok(())
    }
}

impl FromStr for Pattern {
    type Err = PuzzleError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        input
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(|part| part.parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map(Pattern)
            .map_err(|_| PuzzleError::InvalidPattern {
                input: input.to_owned(),
            })
    }
}

impl From<&PuzzleState> for Pattern {
    fn from(state: &PuzzleState) -> Self {
        Pattern(state.tiles.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PuzzleState {
    board: Board,
    tiles: Vec<u32>,
    blank: usize,
}

impl PuzzleState {
    pub fn new(board: Board, pattern: &Pattern) -> Result<Self, PuzzleError> {
        pattern.validate(board)?;
        let tiles = pattern.tiles().to_vec();
        let blank = tiles
            .iter()
            .position(|&tile| tile == BLANK)
            .ok_or(PuzzleError::WrongCellCount {
                expected: board.cells(),
                actual: tiles.len(),
            })?;
        Ok(Self {
            board,
            tiles,
            blank,
        })
    }

    /// Builds a state on the classic 3x3 board.
    pub fn from_tiles(tiles: &[u32]) -> Result<Self, PuzzleError> {
        Self::new(Board::CLASSIC, &Pattern::new(tiles.to_vec()))
    }

    /// Tiles in reading order with the blank in the last cell.
    pub fn solved(board: Board) -> Self {
        let cells = board.cells();
        let mut tiles: Vec<u32> = (1..cells as u32).collect();
        tiles.push(BLANK);
        Self {
            board,
            tiles,
            blank: cells - 1,
        }
    }

    pub fn board(&self) -> Board {
        self.board
    }

    pub fn tiles(&self) -> &[u32] {
        &self.tiles
    }

    pub fn blank(&self) -> usize {
        self.blank
    }

    /// Slides up to `step.count()` tiles towards `step.direction()`, stopping
    /// early when the blank reaches the border. Returns how many tiles moved.
    pub fn apply(&mut self, step: &Move) -> Result<usize, PuzzleError> {
        match self.tiles.get(self.blank) {
            Some(&BLANK) => {}
            found => {
                let fault = PuzzleError::CorruptedBlank {
                    grid: self.to_string(),
                    attempted: *step,
                    blank: self.blank,
                    found: found.copied(),
                    actual: self.tiles.iter().position(|&tile| tile == BLANK),
                };
                error!("{fault}");
                return Err(fault);
            }
        }

        let direction = step.direction();
        let mut moved = 0;
        while moved < step.count() {
            let Some(next) = direction.feeder(self.board, self.blank) else {
                break;
            };
            self.tiles.swap(self.blank, next);
            self.blank = next;
            moved += 1;
        }
        Ok(moved)
    }

    pub fn matches(&self, other: &PuzzleState) -> bool {
        self.board == other.board && self.tiles == other.tiles
    }

    /// Every run available from the current blank position. After a move only
    /// the orthogonal axis is offered, since another run on the same axis
    /// would either undo or extend the previous one.
    pub fn legal_moves(&self, previous: Option<&Move>) -> Vec<Move> {
        let directions = match previous {
            None => Direction::ALL.to_vec(),
            Some(previous) => previous.direction().axis().orthogonal().directions().to_vec(),
        };

        let (board, blank) = (self.board, self.blank);
        directions
            .into_iter()
            .flat_map(|direction| {
                (1..=direction.max_run(board, blank))
                    .filter_map(NonZeroUsize::new)
                    .map(move |count| Move::run(direction, count))
            })
            .collect()
    }

    /// A random run obeying the same axis alternation as [`Self::legal_moves`].
    /// Only used to scramble.
    pub fn random_move<R: Rng + ?Sized>(&self, previous: Option<&Move>, rng: &mut R) -> Move {
        let picked = match previous {
            None => Direction::random(rng),
            Some(previous) => {
                let [negative, positive] = previous.direction().axis().orthogonal().directions();
                if rng.gen_bool(0.5) {
                    positive
                } else {
                    negative
                }
            }
        };

        // The two directions of an axis always share `axis length - 1` cells of travel.
        let direction = if picked.max_run(self.board, self.blank) == 0 {
            picked.inverse()
        } else {
            picked
        };
        let extra = rng.gen_range(0..direction.max_run(self.board, self.blank));
        Move::run(direction, NonZeroUsize::MIN.saturating_add(extra))
    }

    /// Whether `target` can be reached at all, judged by the inversion parity
    /// invariant that unit slides preserve.
    pub fn is_reachable(&self, target: &PuzzleState) -> bool {
        self.board == target.board && self.parity() == target.parity()
    }

    fn parity(&self) -> usize {
        let inversions = Self::count_inversions(&self.tiles);
        if self.board.width() % 2 == 1 {
            inversions % 2
        } else {
            (inversions + self.board.to_y(self.blank)) % 2
        }
    }

    fn count_inversions(flattened: &[u32]) -> usize {
        flattened
            .iter()
            .enumerate()
            .filter(|&(_, &val)| val != BLANK)
            .map(|(i, &val)| {
                flattened[i + 1..]
                    .iter()
                    .filter(|&&next| next != BLANK && next < val)
                    .count()
            })
            .sum()
    }

    /// Draws the grid with some breathing room. With a move, the blank is
    /// marked `x` and every tile the move would slide gets the direction tag
    /// on its leading side.
    pub fn render(&self, step: Option<&Move>) -> String {
        const CELL_WIDTH: usize = 5;
        const CELL_HEIGHT: usize = 3;

        let board = self.board;
        let mut canvas =
            vec![vec![' '; board.width() * CELL_WIDTH]; board.height() * CELL_HEIGHT];

        for (pos, &tile) in self.tiles.iter().enumerate() {
            if tile == BLANK {
                continue;
            }
            let (x, y) = board.to_xy(pos);
            let label = format!("{tile:>2}");
            for (i, c) in label.chars().enumerate() {
                canvas[y * CELL_HEIGHT + 1][x * CELL_WIDTH + 1 + i] = c;
            }
        }

        if let Some(step) = step {
            let direction = step.direction();
            let mut mark = |pos: usize, c: char| {
                let (x, y) = board.to_xy(pos);
                let (row, col) = match (direction.axis(), direction.is_opposite_sign()) {
                    (Axis::Horizontal, false) => (y * CELL_HEIGHT + 1, x * CELL_WIDTH),
                    (Axis::Horizontal, true) => (y * CELL_HEIGHT + 1, x * CELL_WIDTH + 3),
                    (Axis::Vertical, false) => (y * CELL_HEIGHT, x * CELL_WIDTH + 2),
                    (Axis::Vertical, true) => (y * CELL_HEIGHT + 2, x * CELL_WIDTH + 2),
                };
                canvas[row][col] = c;
            };

            let mut pos = self.blank;
            mark(pos, 'x');
            for _ in 0..step.count() {
                let Some(next) = direction.feeder(board, pos) else {
                    break;
                };
                pos = next;
                mark(pos, direction.tag());
            }
        }

        canvas
            .into_iter()
            .map(|row| row.into_iter().collect::<String>().trim_end().to_owned())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for PuzzleState {
    fn default() -> Self {
        Self::solved(Board::CLASSIC)
    }
}

impl fmt::Display for PuzzleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.tiles.chunks(self.board.width()) {
            for &val in row {
                write!(f, "{:2} ", val)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn step(direction: Direction, count: usize) -> Move {
        Move::new(direction, count).unwrap()
    }

    fn state(tiles: &[u32]) -> PuzzleState {
        PuzzleState::from_tiles(tiles).unwrap()
    }

    #[test]
    fn construction_validates_the_pattern() {
        assert_eq!(
            PuzzleState::from_tiles(&[1, 2, 3, 4, 5, 6, 7, 8]),
            Err(PuzzleError::WrongCellCount {
                expected: 9,
                actual: 8
            })
        );
        assert_eq!(
            PuzzleState::from_tiles(&[1, 2, 3, 4, 5, 6, 7, 8, 9]),
            Err(PuzzleError::TileOutOfRange { tile: 9, max: 8 })
        );
        assert_eq!(
            PuzzleState::from_tiles(&[1, 1, 3, 4, 5, 6, 7, 8, 0]),
            Err(PuzzleError::DuplicateTile { tile: 1 })
        );

        let parsed = state(&[1, 2, 3, 4, 0, 5, 7, 8, 6]);
        assert_eq!(parsed.blank(), 4);
    }

    #[test]
    fn default_is_the_canonical_target() {
        let target = PuzzleState::default();
        assert_eq!(target.tiles(), &[1, 2, 3, 4, 5, 6, 7, 8, 0]);
        assert_eq!(target.blank(), 8);

        let wide = PuzzleState::solved(Board::new(4, 2).unwrap());
        assert_eq!(wide.tiles(), &[1, 2, 3, 4, 5, 6, 7, 0]);
        assert_eq!(wide.blank(), 7);
    }

    #[test]
    fn apply() {
        let mut puzzle = PuzzleState::default();

        puzzle.apply(&step(Direction::Down, 1)).unwrap();
        assert_eq!(puzzle, state(&[1, 2, 3, 4, 5, 0, 7, 8, 6]));

        puzzle.apply(&step(Direction::Up, 1)).unwrap();
        assert_eq!(puzzle, state(&[1, 2, 3, 4, 5, 6, 7, 8, 0]));

        puzzle.apply(&step(Direction::Down, 2)).unwrap();
        assert_eq!(puzzle, state(&[1, 2, 0, 4, 5, 3, 7, 8, 6]));

        puzzle.apply(&step(Direction::Up, 1)).unwrap();
        assert_eq!(puzzle, state(&[1, 2, 3, 4, 5, 0, 7, 8, 6]));

        puzzle.apply(&step(Direction::Right, 2)).unwrap();
        assert_eq!(puzzle, state(&[1, 2, 3, 0, 4, 5, 7, 8, 6]));

        puzzle.apply(&step(Direction::Up, 1)).unwrap();
        assert_eq!(puzzle, state(&[1, 2, 3, 7, 4, 5, 0, 8, 6]));

        puzzle.apply(&step(Direction::Left, 1)).unwrap();
        assert_eq!(puzzle, state(&[1, 2, 3, 7, 4, 5, 8, 0, 6]));
    }

    #[test]
    fn apply_clamps_at_the_border() {
        let mut puzzle = state(&[1, 2, 3, 4, 0, 5, 7, 8, 6]);
        let moved = puzzle.apply(&step(Direction::Left, 5)).unwrap();
        assert_eq!(moved, 1);
        assert_eq!(puzzle, state(&[1, 2, 3, 4, 5, 0, 7, 8, 6]));

        let moved = puzzle.apply(&step(Direction::Left, 1)).unwrap();
        assert_eq!(moved, 0);
        assert_eq!(puzzle, state(&[1, 2, 3, 4, 5, 0, 7, 8, 6]));
    }

    #[test]
    fn apply_reports_a_corrupted_blank() {
        let mut puzzle = PuzzleState::default();
        puzzle.blank = 3;
        let before = puzzle.clone();

        let err = puzzle.apply(&step(Direction::Up, 1)).unwrap_err();
        assert!(err.is_invariant_violation());
        assert!(matches!(
            err,
            PuzzleError::CorruptedBlank {
                blank: 3,
                found: Some(4),
                actual: Some(8),
                ..
            }
        ));
        let message = err.to_string();
        assert!(message.contains("^1"));
        assert!(message.contains("expected at cell 3"));
        assert!(message.contains("actually at Some(8)"));
        assert_eq!(puzzle, before);
    }

    #[test]
    fn legal_moves_alternate_axes() {
        let puzzle = state(&[1, 2, 3, 4, 0, 5, 7, 8, 6]);

        let first = puzzle.legal_moves(None);
        assert_eq!(
            first,
            vec![
                step(Direction::Up, 1),
                step(Direction::Left, 1),
                step(Direction::Down, 1),
                step(Direction::Right, 1),
            ]
        );

        let after_horizontal = puzzle.legal_moves(Some(&step(Direction::Left, 1)));
        assert_eq!(
            after_horizontal,
            vec![step(Direction::Up, 1), step(Direction::Down, 1)]
        );

        let corner = PuzzleState::default();
        let after_vertical = corner.legal_moves(Some(&step(Direction::Down, 1)));
        assert_eq!(
            after_vertical,
            vec![step(Direction::Right, 1), step(Direction::Right, 2)]
        );
    }

    #[test]
    fn legal_moves_are_undone_by_their_inverse() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut puzzle = PuzzleState::default();
        let mut previous = None;
        for _ in 0..50 {
            for candidate in puzzle.legal_moves(previous.as_ref()) {
                let mut copy = puzzle.clone();
                copy.apply(&candidate).unwrap();
                assert_ne!(copy, puzzle);
                copy.apply(&candidate.inverse()).unwrap();
                assert_eq!(copy, puzzle);
            }
            let next = puzzle.random_move(previous.as_ref(), &mut rng);
            puzzle.apply(&next).unwrap();
            previous = Some(next);
        }
    }

    #[test]
    fn random_moves_never_stall() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut puzzle = PuzzleState::default();
        let mut previous: Option<Move> = None;
        for _ in 0..200 {
            let next = puzzle.random_move(previous.as_ref(), &mut rng);
            if let Some(previous) = previous {
                assert_ne!(next.direction().axis(), previous.direction().axis());
            }
            assert!(next.count() <= next.direction().max_run(puzzle.board(), puzzle.blank()));
            assert_eq!(puzzle.apply(&next).unwrap(), next.count());
            previous = Some(next);
        }
    }

    #[test]
    fn reachability_follows_parity() {
        let target = PuzzleState::default();
        assert!(state(&[1, 2, 3, 4, 0, 5, 7, 8, 6]).is_reachable(&target));
        assert!(!state(&[2, 1, 3, 4, 5, 6, 7, 8, 0]).is_reachable(&target));

        let board = Board::new(4, 2).unwrap();
        let solved = PuzzleState::solved(board);
        let mut moved = solved.clone();
        moved.apply(&step(Direction::Down, 1)).unwrap();
        assert!(moved.is_reachable(&solved));
        let swapped =
            PuzzleState::new(board, &Pattern::new(vec![2, 1, 3, 4, 5, 6, 7, 0])).unwrap();
        assert!(!swapped.is_reachable(&solved));
    }

    #[test]
    fn pattern_parsing() {
        let pattern: Pattern = "1,2,3, 4 5 6,0,7,8".parse().unwrap();
        assert_eq!(pattern.tiles(), &[1, 2, 3, 4, 5, 6, 0, 7, 8]);
        assert!(pattern.validate(Board::CLASSIC).is_ok());
        assert!(matches!(
            "1,2,a".parse::<Pattern>(),
            Err(PuzzleError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn render_marks_the_run() {
        let puzzle = state(&[1, 2, 3, 4, 5, 6, 0, 7, 8]);
        let plain = puzzle.render(None);
        assert!(!plain.contains('x'));
        assert_eq!(plain.lines().nth(7).unwrap(), "       7    8");

        let annotated = puzzle.render(Some(&step(Direction::Left, 2)));
        assert_eq!(annotated.lines().nth(7).unwrap(), "x    < 7  < 8");
    }

    #[test]
    fn display_grid() {
        assert_eq!(
            PuzzleState::default().to_string(),
            " 1  2  3 \n 4  5  6 \n 7  8  0 \n"
        );
    }
}
