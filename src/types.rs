//! Board geometry: cells, board dimensions and neighbor enumeration.
//!
//! Cells are addressed as `(row, col)` and ordered row-major, so every
//! `BTreeSet<Cell>` in the crate iterates in the same deterministic order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A board coordinate. Value type, no identity beyond its coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    #[inline(always)]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Board size in rows (`height`) and columns (`width`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub height: usize,
    pub width: usize,
}

impl Dimensions {
    pub const fn new(height: usize, width: usize) -> Self {
        Self { height, width }
    }

    /// Total number of cells on the board.
    #[inline(always)]
    pub fn area(&self) -> usize {
        self.height * self.width
    }

    #[inline(always)]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.height && cell.col < self.width
    }

    /// Row-major flat index, used for the packed `cellStates` export.
    #[inline(always)]
    pub fn index(&self, cell: Cell) -> usize {
        cell.row * self.width + cell.col
    }

    /// Every cell of the board in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let width = self.width;
        (0..self.height).flat_map(move |row| (0..width).map(move |col| Cell::new(row, col)))
    }

    /// In-bounds neighbors of `cell`, never including `cell` itself.
    ///
    /// Walks the 3×3 block centered on the cell with each axis clamped to the
    /// board, which covers corners, edges and interior cells alike.
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> {
        let rows = clamped_span(cell.row, self.height);
        let cols = clamped_span(cell.col, self.width);
        rows.flat_map(move |row| cols.clone().map(move |col| Cell::new(row, col)))
            .filter(move |&n| n != cell)
    }

    /// Number of in-bounds neighbors of `cell` (3, 5 or 8 on boards of size ≥ 2).
    pub fn neighbor_count(&self, cell: Cell) -> usize {
        self.neighbors(cell).count()
    }
}

/// `[center - 1, center + 1]` clamped to `[0, len - 1]`. Empty when `len == 0`.
#[inline(always)]
fn clamped_span(center: usize, len: usize) -> std::ops::RangeInclusive<usize> {
    if len == 0 {
        return 1..=0;
    }
    center.saturating_sub(1)..=center.saturating_add(1).min(len - 1)
}
