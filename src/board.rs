use std::fmt;

/// Dimensions of the tile grid. Cells are indexed row-major, `0..width * height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    width: usize,
    height: usize,
}

impl Board {
    /// The 3x3 frame the robot is built around.
    pub const CLASSIC: Board = Board {
        width: 3,
        height: 3,
    };

    /// Returns `None` for boards too small to slide anything on.
    pub fn new(width: usize, height: usize) -> Option<Self> {
        if width < 2 || height < 2 {
            return None;
        }
        Some(Self { width, height })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cells(&self) -> usize {
        self.width * self.height
    }

    pub fn to_x(&self, pos: usize) -> usize {
        pos % self.width
    }

    pub fn to_y(&self, pos: usize) -> usize {
        pos / self.width
    }

    pub fn to_xy(&self, pos: usize) -> (usize, usize) {
        (self.to_x(pos), self.to_y(pos))
    }

    pub fn to_pos(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::CLASSIC
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_are_row_major() {
        let board = Board::CLASSIC;
        assert_eq!(board.to_xy(0), (0, 0));
        assert_eq!(board.to_xy(5), (2, 1));
        assert_eq!(board.to_xy(7), (1, 2));
        assert_eq!(board.to_pos(2, 1), 5);
        assert_eq!(board.cells(), 9);
    }

    #[test]
    fn rejects_degenerate_boards() {
        assert!(Board::new(1, 3).is_none());
        assert!(Board::new(3, 0).is_none());
        assert_eq!(Board::new(4, 3).map(|b| b.cells()), Some(12));
    }
}
