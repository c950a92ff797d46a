//! Fixed-size cell grid and neighborhood queries.
//!
//! The grid is bounded and does not wrap: any coordinate outside of it is
//! treated as a permanently dead cell.

use std::fmt;

use serde::Serialize;

use crate::error::{LifeError, LifeResult};
use crate::rule::Rule;

/// Relative positions of the 8 cells surrounding a cell (Moore neighborhood).
pub const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Largest number of cells a grid may hold (4096 x 4096).
pub const MAX_CELLS: usize = 1 << 24;

/// Reject grids with a zero-length side or more than [`MAX_CELLS`] cells.
pub(crate) fn check_dimensions(rows: usize, cols: usize) -> LifeResult<()> {
    match rows.checked_mul(cols) {
        Some(cells) if cells > 0 && cells <= MAX_CELLS => Ok(()),
        _ => Err(LifeError::InvalidDimensions { rows, cols }),
    }
}

/// A single cell. It has no identity beyond its position in the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Cell {
    pub is_alive: bool,
}

impl Cell {
    pub const DEAD: Cell = Cell { is_alive: false };
    pub const ALIVE: Cell = Cell { is_alive: true };

    pub fn new(is_alive: bool) -> Self {
        Self { is_alive }
    }
}

/// A row of cells.
pub type Row = Vec<Cell>;

/// A rectangular grid of cells whose dimensions never change after creation.
///
/// Collaborators only ever see a `&Grid`; every mutation goes through
/// [`LifeGame`](crate::LifeGame).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Row>,
}

impl Grid {
    /// Create a grid with every cell dead.
    pub(crate) fn dead(rows: usize, cols: usize) -> LifeResult<Self> {
        Self::from_fn(rows, cols, |_, _| false)
    }

    /// Build a grid by evaluating `alive` at every position.
    pub(crate) fn from_fn(
        rows: usize,
        cols: usize,
        mut alive: impl FnMut(usize, usize) -> bool,
    ) -> LifeResult<Self> {
        check_dimensions(rows, cols)?;

        let cells = (0..rows)
            .map(|r| (0..cols).map(|c| Cell::new(alive(r, c))).collect())
            .collect();

        Ok(Self { rows, cols, cells })
    }

    /// Same dimensions as `self`, contents produced by `alive`.
    pub(crate) fn reshaped(&self, mut alive: impl FnMut(usize, usize) -> bool) -> Self {
        let cells = (0..self.rows)
            .map(|r| (0..self.cols).map(|c| Cell::new(alive(r, c))).collect())
            .collect();

        Self {
            rows: self.rows,
            cols: self.cols,
            cells,
        }
    }

    /// Flip one cell and return its new state.
    pub(crate) fn toggle(&mut self, row: usize, col: usize) -> LifeResult<bool> {
        let (rows, cols) = self.dimensions();
        let cell = self
            .cells
            .get_mut(row)
            .and_then(|r| r.get_mut(col))
            .ok_or(LifeError::OutOfBounds {
                row,
                col,
                rows,
                cols,
            })?;

        cell.is_alive = !cell.is_alive;
        Ok(cell.is_alive)
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Check if a coordinate lies inside the grid.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    /// Get a cell, or `None` outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Liveness of a cell. Positions outside the grid are dead.
    pub fn is_alive(&self, row: usize, col: usize) -> bool {
        self.get(row, col).is_some_and(|c| c.is_alive)
    }

    /// Iterate over rows, top to bottom.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.iter().map(|r| r.as_slice())
    }

    /// Coordinates of all live cells in row-major order.
    pub fn live_cells(&self) -> Vec<(usize, usize)> {
        self.iter_rows()
            .enumerate()
            .flat_map(|(r, row)| {
                row.iter()
                    .enumerate()
                    .filter(|(_, cell)| cell.is_alive)
                    .map(move |(c, _)| (r, c))
            })
            .collect()
    }

    /// Number of live cells.
    pub fn population(&self) -> usize {
        self.cells
            .iter()
            .map(|r| r.iter().filter(|c| c.is_alive).count())
            .sum()
    }

    /// Count live cells among the (up to) 8 in-bounds neighbors of a position.
    pub fn live_neighbors(&self, row: usize, col: usize) -> u8 {
        NEIGHBOR_OFFSETS
            .iter()
            .filter(|(dr, dc)| {
                match (row.checked_add_signed(*dr), col.checked_add_signed(*dc)) {
                    (Some(r), Some(c)) => self.is_alive(r, c),
                    _ => false,
                }
            })
            .count() as u8
    }

    /// Compute the next generation from the whole current grid.
    ///
    /// Every cell reads only `self`, so no cell sees a partially updated
    /// neighbor.
    pub fn next_generation(&self, rule: &dyn Rule) -> Grid {
        self.reshaped(|r, c| rule.next_state(self.is_alive(r, c), self.live_neighbors(r, c)))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.iter_rows() {
            for cell in row {
                f.write_str(if cell.is_alive { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
