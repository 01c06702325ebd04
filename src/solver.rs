use crate::{error::PuzzleError, moves::Move, puzzle::PuzzleState, sequence::Sequence};
use log::{debug, info, trace};
use std::time::{Duration, Instant};

/// Depth ceilings tried in turn by [`Solver::solve_adaptive`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverConfig {
    pub tiers: Vec<usize>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tiers: vec![5, 10, 15, 20, 24],
        }
    }
}

/// Outcome of one bounded search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierReport {
    pub max_depth: usize,
    pub elapsed: Duration,
    pub nodes: u64,
    pub solution_len: Option<usize>,
}

impl TierReport {
    pub fn found(&self) -> bool {
        self.solution_len.is_some()
    }
}

pub struct Solver {
    puzzle: PuzzleState,
    target: PuzzleState,
    solution: Option<Sequence>,
    config: SolverConfig,
    nodes_visited: u64,
}

impl Solver {
    pub fn new(puzzle: PuzzleState, target: PuzzleState) -> Result<Self, PuzzleError> {
        if puzzle.board() != target.board() {
            return Err(PuzzleError::BoardMismatch {
                expected: target.board(),
                actual: puzzle.board(),
            });
        }
        Ok(Self {
            puzzle,
            target,
            solution: None,
            config: SolverConfig::default(),
            nodes_visited: 0,
        })
    }

    #[must_use]
    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn puzzle(&self) -> &PuzzleState {
        &self.puzzle
    }

    pub fn target(&self) -> &PuzzleState {
        &self.target
    }

    pub fn solution(&self) -> Option<&Sequence> {
        self.solution.as_ref()
    }

    /// Moves tried across every search run so far.
    pub fn nodes_visited(&self) -> u64 {
        self.nodes_visited
    }

    /// Depth-first search for a sequence of at most `max_depth` moves.
    ///
    /// Every solution found lowers the ceiling below its own length, so the
    /// result is the shortest one in the order branches are explored. That is
    /// not necessarily the globally shortest solution. `Ok(None)` means no
    /// solution exists within `max_depth`.
    pub fn solve(&mut self, max_depth: usize) -> Result<Option<&Sequence>, PuzzleError> {
        self.solution = None;

        if self.puzzle.matches(&self.target) {
            self.solution = Some(Sequence::new());
            return Ok(self.solution.as_ref());
        }

        let mut search = Search {
            target: &self.target,
            state: self.puzzle.clone(),
            path: Vec::with_capacity(max_depth),
            best: None,
            ceiling: max_depth,
            nodes: 0,
        };
        search.descend()?;

        self.nodes_visited += search.nodes;
        self.solution = search.best.map(Sequence::from);
        Ok(self.solution.as_ref())
    }

    /// Runs [`Self::solve`] once per configured tier, yielding after each so
    /// the caller can report progress or give up between tiers.
    pub fn tiers(&mut self) -> Tiers<'_> {
        Tiers {
            solver: self,
            next: 0,
            done: false,
        }
    }

    /// Tries each tier in turn and stops at the first one that finds a solution.
    pub fn solve_adaptive(&mut self) -> Result<Option<&Sequence>, PuzzleError> {
        for report in self.tiers() {
            report?;
        }
        Ok(self.solution.as_ref())
    }
}

struct Search<'t> {
    target: &'t PuzzleState,
    state: PuzzleState,
    path: Vec<Move>,
    best: Option<Vec<Move>>,
    ceiling: usize,
    nodes: u64,
}

impl Search<'_> {
    fn descend(&mut self) -> Result<(), PuzzleError> {
        for step in self.state.legal_moves(self.path.last()) {
            if self.path.len() >= self.ceiling {
                break;
            }

            self.nodes += 1;
            self.state.apply(&step)?;
            self.path.push(step);

            if self.state.matches(self.target) {
                self.ceiling = self.path.len() - 1;
                trace!(
                    "Found a {} move solution, ceiling is now {}",
                    self.path.len(),
                    self.ceiling
                );
                self.best = Some(self.path.clone());
            } else if self.path.len() < self.ceiling {
                self.descend()?;
            }

            self.path.pop();
            self.state.apply(&step.inverse())?;
        }
        Ok(())
    }
}

pub struct Tiers<'s> {
    solver: &'s mut Solver,
    next: usize,
    done: bool,
}

impl Iterator for Tiers<'_> {
    type Item = Result<TierReport, PuzzleError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let max_depth = *self.solver.config.tiers.get(self.next)?;
        self.next += 1;

        debug!("Searching up to {max_depth} moves...");
        let start = Instant::now();
        let nodes_before = self.solver.nodes_visited;

        let solution_len = match self.solver.solve(max_depth) {
            Ok(solution) => solution.map(Sequence::len),
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };

        let report = TierReport {
            max_depth,
            elapsed: start.elapsed(),
            nodes: self.solver.nodes_visited - nodes_before,
            solution_len,
        };
        match solution_len {
            Some(len) => {
                self.done = true;
                info!(
                    "Found a {len} move solution with ceiling {max_depth} in {:.3}s ({} nodes)",
                    report.elapsed.as_secs_f64(),
                    report.nodes
                );
            }
            None => info!(
                "No solution within {max_depth} moves after {:.3}s ({} nodes)",
                report.elapsed.as_secs_f64(),
                report.nodes
            ),
        }
        Some(Ok(report))
    }
}
