//! Permutation-parity check deciding whether a board can reach the goal.
//!
//! Runs before any search: an unsolvable board would otherwise only be
//! reported after the whole reachable state space had been exhausted.

use crate::board::{Board, BLANK};

/// Pairs `(i, j)`, `i < j`, of non-blank tiles with `tiles[i] > tiles[j]`.
pub fn count_inversions(tiles: &[u8]) -> usize {
    tiles
        .iter()
        .enumerate()
        .filter(|&(_, &val)| val != BLANK)
        .map(|(i, &val)| {
            tiles[i + 1..]
                .iter()
                .filter(|&&next| next != BLANK && next < val)
                .count()
        })
        .sum()
}

/// Whether the board is reachable from the goal.
///
/// Odd sizes: solvable iff the inversion count is even. Even sizes:
/// solvable iff inversions plus the blank's row index (from the top) is odd.
pub fn is_solvable(board: &Board) -> bool {
    let inversions = count_inversions(board.tiles());
    let (blank_row, _) = board.blank();

    if board.size() % 2 == 1 {
        inversions % 2 == 0
    } else {
        (inversions + blank_row) % 2 == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Direction;

    fn board(rows: &[&[u8]]) -> Board {
        Board::from_rows(rows).unwrap()
    }

    /// Walk the blank along a fixed, deterministic pattern.
    fn scramble(mut b: Board, steps: usize) -> Board {
        let pattern = [
            Direction::Up,
            Direction::Left,
            Direction::Up,
            Direction::Right,
            Direction::Down,
            Direction::Left,
            Direction::Left,
        ];
        for dir in pattern.iter().cycle().take(steps) {
            if let Some(next) = b.apply(*dir) {
                b = next;
            }
        }
        b
    }

    #[test]
    fn test_count_inversions() {
        assert_eq!(count_inversions(&[1, 2, 3, 4, 5, 6, 7, 8, 0]), 0);
        assert_eq!(count_inversions(&[1, 2, 3, 4, 5, 6, 8, 7, 0]), 1);
        assert_eq!(count_inversions(&[0, 3, 2, 1]), 3);
        assert_eq!(count_inversions(&[8, 7, 6, 5, 4, 3, 2, 1, 0]), 28);
    }

    #[test]
    fn test_goal_is_solvable() {
        for size in 1..=8 {
            assert!(is_solvable(&Board::goal(size).unwrap()), "size {size}");
        }
    }

    #[test]
    fn test_reachable_boards_are_solvable() {
        for size in 2..=5 {
            let goal = Board::goal(size).unwrap();
            for steps in [1, 2, 5, 17, 40] {
                let b = scramble(goal.clone(), steps);
                assert!(is_solvable(&b), "size {size}, steps {steps}:\n{b}");
            }
        }
    }

    #[test]
    fn test_single_tile_swap_is_unsolvable() {
        for size in 2..=5 {
            let goal = Board::goal(size).unwrap();
            for steps in [0, 3, 11] {
                let b = scramble(goal.clone(), steps);
                // swap two non-blank tiles
                let mut tiles = b.tiles().to_vec();
                let (i, j) = {
                    let mut idx = tiles.iter().enumerate().filter(|&(_, &v)| v != BLANK);
                    (idx.next().unwrap().0, idx.next().unwrap().0)
                };
                tiles.swap(i, j);
                let swapped = Board::new(size, tiles).unwrap();
                assert!(!is_solvable(&swapped), "size {size}, steps {steps}:\n{swapped}");
            }
        }
    }

    #[test]
    fn test_reference_scenarios() {
        assert!(is_solvable(&board(&[&[1, 2, 3], &[4, 0, 5], &[6, 7, 8]])));
        assert!(!is_solvable(&board(&[&[1, 2, 3], &[4, 5, 6], &[8, 7, 0]])));
        assert!(is_solvable(&board(&[
            &[0, 1, 2, 3],
            &[6, 7, 8, 4],
            &[5, 9, 10, 11],
            &[13, 14, 15, 12]
        ])));
        assert!(!is_solvable(&board(&[
            &[1, 2, 3, 4],
            &[5, 6, 7, 8],
            &[9, 10, 11, 12],
            &[13, 15, 14, 0]
        ])));
    }
}
