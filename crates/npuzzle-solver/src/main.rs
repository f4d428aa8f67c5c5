//! CLI entry point for the N-puzzle solver.
//!
//! Usage:
//!   npuzzle solve [FILE] [options]
//!   npuzzle solve --stdin [options]
//!   npuzzle check [FILE]
//!
//! Boards are JSON arrays of rows, e.g. `[[1,2,3],[4,0,5],[6,7,8]]`.
//! Without a board source the built-in 4x4 board is used.
//!
//! Options:
//!   --random <n>            Solve a random solvable n x n board
//!   --seed <s>              Seed for --random
//!   --json                  Print a JSON report instead of the steps
//!   --max-expansions <k>    Give up after expanding k boards
//!   --timeout <seconds>     Give up after this much time
//!   --no-relax              Keep the first path found to each board

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use npuzzle_solver::report::{self, SolveReport};
use npuzzle_solver::{is_solvable, manhattan, search, solve, Board, BoardError, SolverConfig};

/// Board solved when no input is given
const BUILTIN_BOARD: [[u8; 4]; 4] = [
    [0, 1, 2, 3],
    [6, 7, 8, 4],
    [5, 9, 10, 11],
    [13, 14, 15, 12],
];

#[derive(Parser)]
#[command(name = "npuzzle")]
#[command(about = "A* solver for the N-puzzle")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a board and print every step
    Solve {
        #[command(flatten)]
        input: InputArgs,

        /// Print a JSON report instead of the steps
        #[arg(long)]
        json: bool,

        /// Give up after expanding this many boards
        #[arg(long)]
        max_expansions: Option<usize>,

        /// Give up after this many seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Never re-queue a board reached again by a cheaper path
        #[arg(long)]
        no_relax: bool,
    },
    /// Report whether a board is solvable and its Manhattan distance
    Check {
        #[command(flatten)]
        input: InputArgs,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Path to board JSON file (use --stdin to read from stdin)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Read the board from stdin instead of a file
    #[arg(long, conflicts_with_all = ["file", "random"])]
    stdin: bool,

    /// Use a random solvable board of this size
    #[arg(long, value_name = "N", conflicts_with = "file")]
    random: Option<usize>,

    /// Seed for --random
    #[arg(long, requires = "random")]
    seed: Option<u64>,
}

#[derive(Debug, Error)]
enum InputError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read from stdin: {0}")]
    Stdin(#[source] io::Error),

    #[error("error parsing board JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid board: {0}")]
    Board(#[from] BoardError),
}

impl InputArgs {
    fn load(&self) -> Result<Board, InputError> {
        if let Some(size) = self.random {
            let mut rng = match self.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            return Ok(Board::random_solvable(size, &mut rng)?);
        }

        let json = if self.stdin {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(InputError::Stdin)?;
            buffer
        } else if let Some(path) = &self.file {
            fs::read_to_string(path).map_err(|source| InputError::Io {
                path: path.clone(),
                source,
            })?
        } else {
            return Ok(Board::from_rows(&BUILTIN_BOARD)?);
        };

        Ok(serde_json::from_str(&json)?)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let code = match cli.command {
        Commands::Solve {
            input,
            json,
            max_expansions,
            timeout,
            no_relax,
        } => {
            let config = SolverConfig {
                relax_costs: !no_relax,
                max_expansions,
                timeout: timeout.map(Duration::from_secs),
            };
            run_solve(&input, &config, json)
        }
        Commands::Check { input } => run_check(&input),
    };

    process::exit(code);
}

fn load_or_exit(input: &InputArgs) -> Board {
    match input.load() {
        Ok(board) => board,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run_solve(input: &InputArgs, config: &SolverConfig, json: bool) -> i32 {
    let board = load_or_exit(input);
    debug!("loaded {0}x{0} board:\n{1}", board.size(), board);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if json {
        let result = solve(&board, config);
        let output = SolveReport::from_result(&result);
        let written = serde_json::to_string_pretty(&output)
            .map_err(io::Error::from)
            .and_then(|text| writeln!(out, "{}", text));
        if let Err(e) = written {
            eprintln!("Error: {}", e);
            return 1;
        }
        return if result.is_ok() { 0 } else { 1 };
    }

    match write_steps(&mut out, &board, config) {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

/// Text outcome of a solve. Returns whether a solution was printed.
///
/// The parity gate runs here rather than inside `solve` so the banner is
/// only printed for boards that are actually searched.
fn write_steps<W: Write>(out: &mut W, board: &Board, config: &SolverConfig) -> io::Result<bool> {
    if !is_solvable(board) {
        writeln!(out, "{}", report::UNSOLVABLE)?;
        return Ok(false);
    }
    writeln!(out, "{}", report::SOLVING)?;
    out.flush()?;

    match search(board, config) {
        Ok(solution) => {
            info!(
                "found a {}-move solution after expanding {} boards",
                solution.move_count(),
                solution.stats.expanded
            );
            report::write_solution(out, &solution.path)?;
            Ok(true)
        }
        Err(err) => {
            if let Some(stats) = err.stats() {
                info!("search stopped after expanding {} boards", stats.expanded);
            }
            writeln!(out, "{}", report::failure_message(&err))?;
            Ok(false)
        }
    }
}

fn run_check(input: &InputArgs) -> i32 {
    let board = load_or_exit(input);
    let solvable = is_solvable(&board);
    println!("{}", board);
    println!("solvable: {}", solvable);
    println!("manhattan distance: {}", manhattan(&board));
    if solvable {
        0
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_board_is_solvable() {
        let board = Board::from_rows(&BUILTIN_BOARD).unwrap();
        assert!(is_solvable(&board));
    }

    #[test]
    fn test_parse_solve_flags() {
        let cli = Cli::try_parse_from([
            "npuzzle",
            "solve",
            "board.json",
            "--json",
            "--max-expansions",
            "500",
            "--no-relax",
        ])
        .unwrap();
        match cli.command {
            Commands::Solve {
                input,
                json,
                max_expansions,
                timeout,
                no_relax,
            } => {
                assert_eq!(input.file, Some(PathBuf::from("board.json")));
                assert!(json);
                assert_eq!(max_expansions, Some(500));
                assert_eq!(timeout, None);
                assert!(no_relax);
            }
            Commands::Check { .. } => panic!("expected solve"),
        }
    }

    #[test]
    fn test_conflicting_sources_rejected() {
        assert!(Cli::try_parse_from(["npuzzle", "solve", "board.json", "--stdin"]).is_err());
        assert!(Cli::try_parse_from(["npuzzle", "solve", "--seed", "3"]).is_err());
    }

    #[test]
    fn test_random_input_is_seeded() {
        let args = InputArgs {
            file: None,
            stdin: false,
            random: Some(3),
            seed: Some(11),
        };
        let a = args.load().unwrap();
        let b = args.load().unwrap();
        assert_eq!(a, b);
        assert!(is_solvable(&a));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let args = InputArgs {
            file: Some(PathBuf::from("/definitely/not/here.json")),
            stdin: false,
            random: None,
            seed: None,
        };
        let err = args.load().unwrap_err();
        assert!(matches!(err, InputError::Io { .. }));
        assert!(err.to_string().contains("not/here.json"));
    }

    /// Writer that rejects every write
    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_steps_for_solvable_board() {
        let board = Board::from_rows(&[[1u8, 2, 3], [4, 5, 6], [7, 0, 8]]).unwrap();
        let mut out = Vec::new();
        assert!(write_steps(&mut out, &board, &SolverConfig::default()).unwrap());
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Solving the puzzle...\nStep 0:\n1 2 3\n"));
        assert!(text.ends_with("Step 1:\n1 2 3\n4 5 6\n7 8 0\n\nSolver finished.\n"));
    }

    #[test]
    fn test_write_steps_skips_banner_when_unsolvable() {
        let board = Board::from_rows(&[[1u8, 2, 3], [4, 5, 6], [8, 7, 0]]).unwrap();
        let mut out = Vec::new();
        assert!(!write_steps(&mut out, &board, &SolverConfig::default()).unwrap());
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "The given puzzle is unsolvable.\n"
        );
    }

    #[test]
    fn test_write_steps_reports_budget() {
        let board = Board::from_rows(&[[8u8, 6, 7], [2, 5, 4], [3, 0, 1]]).unwrap();
        let config = SolverConfig {
            max_expansions: Some(1),
            ..SolverConfig::default()
        };
        let mut out = Vec::new();
        assert!(!write_steps(&mut out, &board, &config).unwrap());
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with(&format!("{}\n", report::BUDGET_EXCEEDED)));
    }

    #[test]
    fn test_write_errors_propagate() {
        let solvable = Board::goal(3).unwrap();
        let unsolvable = Board::from_rows(&[[1u8, 2, 3], [4, 5, 6], [8, 7, 0]]).unwrap();
        for board in [solvable, unsolvable] {
            let err = write_steps(&mut ClosedPipe, &board, &SolverConfig::default()).unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        }
    }

    #[test]
    fn test_default_input_is_builtin() {
        let args = InputArgs {
            file: None,
            stdin: false,
            random: None,
            seed: None,
        };
        assert_eq!(
            args.load().unwrap(),
            Board::from_rows(&BUILTIN_BOARD).unwrap()
        );
    }
}
