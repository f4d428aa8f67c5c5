//! Manhattan-distance heuristic.

use crate::board::{Board, BLANK};

/// Sum over every non-blank tile of the grid distance to its goal cell.
///
/// Each move shifts exactly one tile by one cell, so this never overestimates
/// the remaining move count and changes by exactly one per move.
pub fn manhattan(board: &Board) -> u32 {
    let size = board.size();
    let mut distance = 0;
    for (index, &value) in board.tiles().iter().enumerate() {
        if value == BLANK {
            continue;
        }
        let (row, col) = (index / size, index % size);
        let target = value as usize - 1;
        let (goal_row, goal_col) = (target / size, target % size);
        distance += row.abs_diff(goal_row) + col.abs_diff(goal_col);
    }
    distance as u32
}
