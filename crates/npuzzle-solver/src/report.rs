//! Rendering of search outcomes, as plain text or as a JSON document.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::board::{Board, Direction};
use crate::error::SolveError;
use crate::solver::{SearchStats, Solution};

pub const SOLVING: &str = "Solving the puzzle...";
pub const FINISHED: &str = "Solver finished.";
pub const NO_SOLUTION: &str = "No solution found.";
pub const UNSOLVABLE: &str = "The given puzzle is unsolvable.";
pub const BUDGET_EXCEEDED: &str = "Search limit reached before a solution was found.";

/// Print every board of the path under a `Step k:` header, then the
/// completion marker.
pub fn write_solution<W: Write>(out: &mut W, path: &[Board]) -> io::Result<()> {
    for (step, board) in path.iter().enumerate() {
        writeln!(out, "Step {}:", step)?;
        writeln!(out, "{}", board)?;
    }
    writeln!(out, "{}", FINISHED)
}

/// One-line message for a failed solve
pub fn failure_message(err: &SolveError) -> &'static str {
    match err {
        SolveError::Unsolvable => UNSOLVABLE,
        SolveError::Exhausted { .. } => NO_SOLUTION,
        SolveError::BudgetExceeded { .. } => BUDGET_EXCEEDED,
    }
}

/// Machine-readable outcome of a solve
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveReport {
    pub solvable: bool,
    pub solved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub move_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moves: Option<Vec<Direction>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<Board>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<StatsOutput>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsOutput {
    pub expanded: usize,
    pub generated: usize,
    pub max_frontier: usize,
    pub time_elapsed_ms: u64,
}

impl From<&SearchStats> for StatsOutput {
    fn from(stats: &SearchStats) -> Self {
        Self {
            expanded: stats.expanded,
            generated: stats.generated,
            max_frontier: stats.max_frontier,
            time_elapsed_ms: stats.time_elapsed_ms(),
        }
    }
}

impl SolveReport {
    pub fn from_result(result: &Result<Solution, SolveError>) -> Self {
        match result {
            Ok(solution) => Self {
                solvable: true,
                solved: true,
                reason: None,
                move_count: Some(solution.move_count()),
                moves: Some(solution.moves.clone()),
                path: Some(solution.path.clone()),
                stats: Some(StatsOutput::from(&solution.stats)),
            },
            Err(err) => Self {
                solvable: !matches!(err, SolveError::Unsolvable),
                solved: false,
                reason: Some(err.to_string()),
                move_count: None,
                moves: None,
                path: None,
                stats: err.stats().map(StatsOutput::from),
            },
        }
    }
}
