//! Error types for board construction and search.

use thiserror::Error;

use crate::solver::SearchStats;

/// A board that violates the N-puzzle invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("board size {0} is not supported (expected 1..={max})", max = crate::board::MAX_SIZE)]
    UnsupportedSize(usize),

    #[error("expected {expected} tiles for a {size}x{size} board, got {actual}")]
    WrongTileCount {
        size: usize,
        expected: usize,
        actual: usize,
    },

    #[error("row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("tile {value} is out of range for a {size}x{size} board")]
    TileOutOfRange { value: u8, size: usize },

    #[error("tile {0} appears more than once")]
    DuplicateTile(u8),

    #[error("board has no blank cell (0)")]
    MissingBlank,
}

/// Why a search did not produce a solution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// Rejected by the parity check; no search was run.
    #[error("the given puzzle is unsolvable")]
    Unsolvable,

    /// The frontier emptied without reaching the goal.
    #[error("search exhausted after expanding {} boards", .stats.expanded)]
    Exhausted { stats: SearchStats },

    /// A configured expansion or time limit was hit first.
    #[error("search budget exceeded after expanding {} boards", .stats.expanded)]
    BudgetExceeded { stats: SearchStats },
}

impl SolveError {
    /// Statistics of the aborted run, if a search was started.
    pub fn stats(&self) -> Option<&SearchStats> {
        match self {
            SolveError::Unsolvable => None,
            SolveError::Exhausted { stats } | SolveError::BudgetExceeded { stats } => Some(stats),
        }
    }
}
