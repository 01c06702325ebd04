use crate::{error::PuzzleError, puzzle::PuzzleState};
use clap::ValueEnum;

/// Fixed starting arrangements for a game without a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Template {
    Easy,
    Medium,
    Hard,
}

impl Template {
    pub fn tiles(&self) -> [u32; 9] {
        match self {
            Template::Easy => [1, 2, 3, 4, 0, 5, 7, 8, 6],
            Template::Medium => [4, 1, 2, 5, 0, 3, 7, 8, 6],
            Template::Hard => [1, 2, 0, 4, 8, 3, 5, 7, 6],
        }
    }

    pub fn state(&self) -> Result<PuzzleState, PuzzleError> {
        PuzzleState::from_tiles(&self.tiles())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::Sequence;

    #[test]
    fn templates_are_scrambles_of_the_target() {
        for (template, scramble) in [
            (Template::Easy, "v1 >1"),
            (Template::Medium, "v2 >2 ^1 <1"),
            (Template::Hard, "v2 >2 ^1 <1 ^1 >1 v2 <2"),
        ] {
            let scramble: Sequence = scramble.parse().unwrap();
            let mut state = PuzzleState::default();
            scramble.apply(&mut state).unwrap();
            assert_eq!(state, template.state().unwrap(), "{template:?}");
        }
    }
}
