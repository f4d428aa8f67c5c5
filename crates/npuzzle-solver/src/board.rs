//! Board representation for the N-puzzle.
//!
//! A board is an immutable `N x N` grid stored row-major. Moves never mutate
//! a board in place; they return a new one. Boards serialize as a JSON array
//! of rows, e.g. `[[1, 2, 3], [4, 0, 5], [6, 7, 8]]`.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::BoardError;
use crate::solvability::is_solvable;

/// Largest supported side length; `16 * 16 - 1` is the largest value a `u8` tile holds.
pub const MAX_SIZE: usize = 16;

/// Value of the blank cell
pub const BLANK: u8 = 0;

/// Direction the blank moves in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions in successor order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// (row, col) offset of the blank
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(s)
    }
}

/// Successors of a board: at most one per direction.
pub type Successors = SmallVec<[(Direction, Board); 4]>;

/// An `N x N` tile arrangement with exactly one blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")]
pub struct Board {
    size: usize,
    tiles: Box<[u8]>,
    /// Row-major index of the blank, derived from `tiles`
    blank: usize,
}

impl Board {
    /// Build a board from row-major tiles, validating every invariant.
    pub fn new(size: usize, tiles: Vec<u8>) -> Result<Self, BoardError> {
        if size == 0 || size > MAX_SIZE {
            return Err(BoardError::UnsupportedSize(size));
        }
        let expected = size * size;
        if tiles.len() != expected {
            return Err(BoardError::WrongTileCount {
                size,
                expected,
                actual: tiles.len(),
            });
        }

        let mut seen = vec![false; expected];
        for &value in &tiles {
            let slot = seen
                .get_mut(value as usize)
                .ok_or(BoardError::TileOutOfRange { value, size })?;
            if *slot {
                return Err(BoardError::DuplicateTile(value));
            }
            *slot = true;
        }

        // n distinct values in 0..n cover the whole range, so this only
        // fires if the range check above is ever loosened.
        let blank = tiles
            .iter()
            .position(|&v| v == BLANK)
            .ok_or(BoardError::MissingBlank)?;

        Ok(Self {
            size,
            tiles: tiles.into_boxed_slice(),
            blank,
        })
    }

    /// Build a board from a list of rows. The side length is the row count.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, BoardError> {
        let size = rows.len();
        let mut tiles = Vec::with_capacity(size * size);
        for (row, cells) in rows.iter().enumerate() {
            let cells = cells.as_ref();
            if cells.len() != size {
                return Err(BoardError::RaggedRow {
                    row,
                    expected: size,
                    actual: cells.len(),
                });
            }
            tiles.extend_from_slice(cells);
        }
        Self::new(size, tiles)
    }

    /// The solved board: `1..N*N-1` in row-major order, blank last.
    pub fn goal(size: usize) -> Result<Self, BoardError> {
        if size == 0 || size > MAX_SIZE {
            return Err(BoardError::UnsupportedSize(size));
        }
        let cells = size * size;
        let tiles = (1..cells)
            .map(|v| v as u8)
            .chain(std::iter::once(BLANK))
            .collect();
        Self::new(size, tiles)
    }

    /// Shuffle uniformly until the parity check accepts the arrangement.
    pub fn random_solvable<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Result<Self, BoardError> {
        let mut tiles = Self::goal(size)?.tiles.into_vec();
        loop {
            tiles.shuffle(rng);
            let board = Self::new(size, tiles.clone())?;
            if is_solvable(&board) {
                return Ok(board);
            }
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Row-major cells
    pub fn tiles(&self) -> &[u8] {
        &self.tiles
    }

    /// Tile at a position (bounds-checked)
    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        if row >= self.size || col >= self.size {
            return None;
        }
        Some(self.tiles[row * self.size + col])
    }

    /// (row, col) of the blank
    pub fn blank(&self) -> (usize, usize) {
        (self.blank / self.size, self.blank % self.size)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.tiles.chunks(self.size)
    }

    /// Whether this is the solved arrangement for its size.
    pub fn is_goal(&self) -> bool {
        let last = self.tiles.len() - 1;
        self.blank == last
            && self.tiles[..last]
                .iter()
                .enumerate()
                .all(|(i, &v)| v as usize == i + 1)
    }

    /// Slide the blank one cell. Returns `None` if it would leave the grid.
    pub fn apply(&self, direction: Direction) -> Option<Board> {
        let (row, col) = self.blank();
        let (dr, dc) = direction.delta();
        let new_row = row.checked_add_signed(dr).filter(|&r| r < self.size)?;
        let new_col = col.checked_add_signed(dc).filter(|&c| c < self.size)?;

        let target = new_row * self.size + new_col;
        let mut tiles = self.tiles.clone();
        tiles.swap(self.blank, target);
        Some(Board {
            size: self.size,
            tiles,
            blank: target,
        })
    }

    /// Boards reachable in one move, in the order up, down, left, right.
    pub fn successors(&self) -> Successors {
        Direction::ALL
            .iter()
            .filter_map(|&dir| self.apply(dir).map(|board| (dir, board)))
            .collect()
    }

    /// Direction of the single blank move leading from `self` to `next`, if any.
    pub fn move_to(&self, next: &Board) -> Option<Direction> {
        if next.size != self.size {
            return None;
        }
        Direction::ALL
            .iter()
            .copied()
            .find(|&dir| self.apply(dir).as_ref() == Some(next))
    }
}

impl TryFrom<Vec<Vec<u8>>> for Board {
    type Error = BoardError;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self, Self::Error> {
        Board::from_rows(&rows)
    }
}

impl From<Board> for Vec<Vec<u8>> {
    fn from(board: Board) -> Self {
        board.rows().map(<[u8]>::to_vec).collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let mut first = true;
            for value in row {
                if !first {
                    f.write_str(" ")?;
                }
                write!(f, "{}", value)?;
                first = false;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
