use crate::board::Board;
use rand::Rng;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub fn orthogonal(&self) -> Self {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }

    /// Number of cells along this axis.
    pub fn cells(&self, board: Board) -> usize {
        match self {
            Axis::Horizontal => board.width(),
            Axis::Vertical => board.height(),
        }
    }

    /// The two directions on this axis, negative sign first.
    pub fn directions(&self) -> [Direction; 2] {
        match self {
            Axis::Horizontal => [Direction::Left, Direction::Right],
            Axis::Vertical => [Direction::Up, Direction::Down],
        }
    }
}

/// The direction the tiles travel when a run is applied. The blank travels the
/// other way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Left,
    Down,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Left,
        Direction::Down,
        Direction::Right,
    ];

    pub fn axis(&self) -> Axis {
        match self {
            Direction::Up | Direction::Down => Axis::Vertical,
            Direction::Left | Direction::Right => Axis::Horizontal,
        }
    }

    /// True for the directions that travel towards increasing coordinates.
    pub fn is_opposite_sign(&self) -> bool {
        matches!(self, Direction::Down | Direction::Right)
    }

    pub fn inverse(&self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn tag(&self) -> char {
        match self {
            Direction::Up => '^',
            Direction::Left => '<',
            Direction::Down => 'v',
            Direction::Right => '>',
        }
    }

    pub fn from_tag(tag: char) -> Option<Self> {
        Self::ALL.into_iter().find(|direction| direction.tag() == tag)
    }

    /// Signed cell index delta of one step in this direction.
    pub fn stride(&self, board: Board) -> isize {
        let step = match self.axis() {
            Axis::Horizontal => 1,
            Axis::Vertical => board.width() as isize,
        };
        if self.is_opposite_sign() {
            step
        } else {
            -step
        }
    }

    /// Coordinate of `pos` along this axis, counted from the border a tile
    /// travelling this way leaves behind.
    pub fn offset_in_axis(&self, board: Board, pos: usize) -> usize {
        let in_axis = match self.axis() {
            Axis::Horizontal => board.to_x(pos),
            Axis::Vertical => board.to_y(pos),
        };
        if self.is_opposite_sign() {
            self.axis().cells(board) - 1 - in_axis
        } else {
            in_axis
        }
    }

    /// How many tiles a run in this direction can slide with the blank at `pos`.
    pub fn max_run(&self, board: Board, pos: usize) -> usize {
        self.axis().cells(board) - 1 - self.offset_in_axis(board, pos)
    }

    pub fn is_at_border(&self, board: Board, pos: usize) -> bool {
        self.offset_in_axis(board, pos) == self.axis().cells(board) - 1
    }

    /// The cell whose tile slides into `pos`, or `None` when `pos` is at the border.
    pub fn feeder(&self, board: Board, pos: usize) -> Option<usize> {
        if self.is_at_border(board, pos) {
            return None;
        }
        pos.checked_add_signed(-self.stride(board))
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Direction::Up => "Up",
            Direction::Left => "Left",
            Direction::Down => "Down",
            Direction::Right => "Right",
        };
        write!(f, "{}", s)
    }
}
