//! The 3×3 board.
//!
//! ## Layout
//!
//! Cells are indexed `0..9` in row-major order:
//!
//! ```text
//!  0 | 1 | 2
//! ---+---+---
//!  3 | 4 | 5
//! ---+---+---
//!  6 | 7 | 8
//! ```
//!
//! `LINES` enumerates the eight winning triples: rows first, then columns,
//! then the two diagonals. Win detection scans them in this order.

use smallvec::SmallVec;
use std::ops::Index;

use super::mark::Mark;

/// Number of cells on the board.
pub const CELL_COUNT: usize = 9;

/// Winning triples in scan order: rows, columns, diagonals.
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Nine cells, each empty or holding a mark.
///
/// ```
/// use ttt_sync::core::{Board, Mark};
///
/// let mut cells = [None; 9];
/// cells[4] = Some(Mark::X);
/// let board = Board::from_cells(cells);
///
/// assert_eq!(board[4], Some(Mark::X));
/// assert!(board.is_empty_at(0));
/// assert_eq!(board.empty_cells().len(), 8);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Option<Mark>; CELL_COUNT],
}

impl Board {
    /// An all-empty board.
    #[must_use]
    pub const fn new() -> Self {
        Self { cells: [None; CELL_COUNT] }
    }

    /// Build a board from raw cells.
    #[must_use]
    pub const fn from_cells(cells: [Option<Mark>; CELL_COUNT]) -> Self {
        Self { cells }
    }

    /// Raw cells in index order.
    #[must_use]
    pub const fn cells(&self) -> &[Option<Mark>; CELL_COUNT] {
        &self.cells
    }

    /// Whether `index` is on the board and empty.
    #[must_use]
    pub fn is_empty_at(&self, index: usize) -> bool {
        matches!(self.cells.get(index), Some(None))
    }

    /// Whether every cell holds a mark.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Indices of the empty cells, ascending.
    #[must_use]
    pub fn empty_cells(&self) -> SmallVec<[usize; CELL_COUNT]> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(index, _)| index)
            .collect()
    }

    /// Number of cells holding `mark`.
    #[must_use]
    pub fn count(&self, mark: Mark) -> usize {
        self.cells.iter().filter(|cell| **cell == Some(mark)).count()
    }

    /// Place a mark. Callers validate emptiness and bounds first.
    pub(crate) fn place(&mut self, index: usize, mark: Mark) {
        debug_assert!(self.is_empty_at(index));
        self.cells[index] = Some(mark);
    }
}

impl Index<usize> for Board {
    type Output = Option<Mark>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.cells[index]
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (row, chunk) in self.cells.chunks(3).enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            let symbols: Vec<&str> = chunk
                .iter()
                .map(|cell| cell.map_or(".", Mark::symbol))
                .collect();
            write!(f, "{}", symbols.join(""))?;
        }
        Ok(())
    }
}
