use clap::{Parser, Subcommand};
use color_eyre::eyre::{bail, Result};
use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};
use log::{info, warn};
use rand::{rngs::StdRng, SeedableRng};
use slider_robot::{
    Board, Cursor, Pattern, PuzzleState, Sequence, Solver, SolverConfig, Template,
};
use std::{
    io, thread,
    time::{Duration, Instant},
};

#[derive(Parser, Debug)]
#[command(
    name = "slider-robot",
    about = "Solves a sliding tile puzzle and prints the move text for the robot"
)]
struct Opts {
    /// Depth ceilings to try in turn, comma separated.
    #[arg(long, value_delimiter = ',', default_values_t = SolverConfig::default().tiers)]
    tiers: Vec<usize>,

    /// Pause between playback frames.
    #[arg(long, default_value = "700")]
    delay_ms: u64,

    #[arg(long)]
    no_playback: bool,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Scramble the target with random runs.
    Random {
        #[arg(short = 'n', long, default_value = "5")]
        length: usize,

        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// Start from a fixed arrangement.
    Template {
        #[arg(value_enum)]
        difficulty: Template,
    },
    /// Start from a scanned pattern, e.g. `1,2,3,4,5,6,0,7,8`.
    Pattern {
        pattern: Pattern,

        #[arg(long)]
        target: Option<Pattern>,
    },
}

struct Playback {
    enabled: bool,
    delay: Duration,
}

impl Playback {
    fn play(&self, sequence: &Sequence, start: &PuzzleState) -> Result<PuzzleState> {
        let mut cursor = Cursor::new(sequence, start);
        if !self.enabled {
            return Ok(cursor.finish()?);
        }

        let mut stdout = io::stdout();
        while cursor.has_next() {
            execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;
            println!("{}", cursor.render(false));
            thread::sleep(self.delay);
            cursor.advance()?;
        }
        execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;
        println!("{}", cursor.render(false));

        Ok(cursor.current_state().clone())
    }
}

/// Warns and returns `false` when the parity check rules out any solution.
fn worth_searching(puzzle: &PuzzleState, target: &PuzzleState) -> bool {
    if puzzle.is_reachable(target) {
        return true;
    }
    warn!("No sequence of moves leads from\n{puzzle}to\n{target}so the search is skipped");
    false
}

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opts = Opts::parse();
    let playback = Playback {
        enabled: !opts.no_playback,
        delay: Duration::from_millis(opts.delay_ms),
    };
    let config = SolverConfig { tiers: opts.tiers };

    let (puzzle, target) = match opts.mode {
        Mode::Random { length, seed } => {
            let target = PuzzleState::default();
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let scramble = Sequence::random(&target, length, &mut rng)?;
            info!("Scrambling with {scramble}");
            (playback.play(&scramble, &target)?, target)
        }
        Mode::Template { difficulty } => (difficulty.state()?, PuzzleState::default()),
        Mode::Pattern { pattern, target } => {
            let target = match target {
                Some(target) => PuzzleState::new(Board::CLASSIC, &target)?,
                None => PuzzleState::default(),
            };
            (PuzzleState::new(Board::CLASSIC, &pattern)?, target)
        }
    };

    println!("Initial Puzzle:\n{}", puzzle);
    if !worth_searching(&puzzle, &target) {
        return Ok(());
    }

    let start = Instant::now();
    let mut solver = Solver::new(puzzle.clone(), target.clone())?.with_config(config);
    for report in solver.tiers() {
        let report = report?;
        println!(
            "Ceiling {:>2}: {} after {:.3}s",
            report.max_depth,
            match report.solution_len {
                Some(len) => format!("found {len} moves"),
                None => "nothing".to_owned(),
            },
            report.elapsed.as_secs_f64()
        );
    }

    let Some(solution) = solver.solution().cloned() else {
        bail!("No solution within the configured ceilings");
    };

    let end = playback.play(&solution, &puzzle)?;
    if !end.matches(&target) {
        bail!("Replaying {solution} did not reach the target, ended at\n{end}");
    }

    println!("Found solution with {} moves: {}", solution.len(), solution);
    println!("Solved in {:.1}s", start.elapsed().as_secs_f64());
    Ok(())
}
