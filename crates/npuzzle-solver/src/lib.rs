//! N-puzzle solver library.
//!
//! This crate solves sliding tile puzzles of any side length with A* search
//! and the Manhattan-distance heuristic. Boards are checked for solvability
//! with a permutation-parity test before any search is started.

pub mod board;
pub mod error;
pub mod heuristic;
pub mod report;
pub mod solvability;
pub mod solver;

// Re-export main types
pub use board::{Board, Direction, MAX_SIZE};
pub use error::{BoardError, SolveError};
pub use heuristic::manhattan;
pub use solvability::{count_inversions, is_solvable};
pub use solver::{search, solve, SearchStats, Solution, SolverConfig};
