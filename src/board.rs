//! Board grid: cell tags, the wall border, and row bookkeeping
//!
//! The grid is a fixed 12x20 matrix addressed as (x, y) with row 0 at the
//! top and y growing downward. The leftmost column, rightmost column and
//! bottom row are permanent `Wall` cells; play happens in the 10x19
//! interior. Row completion and collapse are grid transformations, so they
//! live here next to the storage.

use std::ops::RangeInclusive;

/// Total grid width, wall columns included.
pub const GRID_WIDTH: usize = 12;
/// Total grid height, the floor row included.
pub const GRID_HEIGHT: usize = 20;

/// One grid cell. Exactly one tag at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    /// Part of the piece currently falling.
    Moving,
    /// Settled stack material.
    Full,
    /// Permanent border, written once at initialization.
    Wall,
    /// Part of a completed row, held on screen for the clear animation.
    Fading,
}

impl Cell {
    /// Whether a falling piece stops against this cell.
    pub fn is_solid(self) -> bool {
        matches!(self, Cell::Full | Cell::Wall)
    }
}

/// The play grid for one player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [[Cell; GRID_WIDTH]; GRID_HEIGHT], // row-major: cells[y][x]
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// An empty board with the wall border in place.
    pub fn new() -> Self {
        let mut cells = [[Cell::Empty; GRID_WIDTH]; GRID_HEIGHT];
        for row in &mut cells {
            row[0] = Cell::Wall;
            row[GRID_WIDTH - 1] = Cell::Wall;
        }
        cells[GRID_HEIGHT - 1] = [Cell::Wall; GRID_WIDTH];
        Board { cells }
    }

    /// The cell at (x, y).
    ///
    /// Coordinates outside the allocated grid are a caller bug; this panics
    /// rather than clamping. Geometry code probes with [`Board::contains`]
    /// first.
    pub fn cell(&self, x: i32, y: i32) -> Cell {
        self.cells[y as usize][x as usize]
    }

    /// Overwrite the cell at (x, y). Same contract as [`Board::cell`].
    pub fn set_cell(&mut self, x: i32, y: i32, cell: Cell) {
        self.cells[y as usize][x as usize] = cell;
    }

    /// Whether (x, y) lies inside the allocated grid, walls included.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        (0..GRID_WIDTH as i32).contains(&x) && (0..GRID_HEIGHT as i32).contains(&y)
    }

    /// Columns of the playable interior, in ascending order.
    pub fn interior_cols() -> RangeInclusive<i32> {
        1..=(GRID_WIDTH as i32 - 2)
    }

    /// Rows of the playable interior, top to bottom.
    pub fn interior_rows() -> RangeInclusive<i32> {
        0..=(GRID_HEIGHT as i32 - 2)
    }

    /// Mark every complete interior row as `Fading`.
    ///
    /// A row is complete when all of its interior cells are `Full`; `Moving`
    /// cells never count. Returns whether at least one row was marked.
    pub fn mark_complete_rows(&mut self) -> bool {
        let mut marked = false;
        for y in Board::interior_rows().rev() {
            let full = Board::interior_cols()
                .filter(|&x| self.cell(x, y) == Cell::Full)
                .count();
            if full == GRID_WIDTH - 2 {
                for x in Board::interior_cols() {
                    self.set_cell(x, y, Cell::Fading);
                }
                marked = true;
            }
        }
        marked
    }

    /// Remove every `Fading` row and compact the stack above it.
    ///
    /// Bottom-up, one row at a time: empty the fading row, shift the
    /// settled material of each row above down by one, then re-check the
    /// same row index, since fading rows stacked on top fall into it and
    /// are removed in turn. Returns how many rows were removed.
    pub fn collapse_marked_rows(&mut self) -> u32 {
        let left = *Board::interior_cols().start();
        let mut removed = 0;
        for y in Board::interior_rows().rev() {
            while self.cell(left, y) == Cell::Fading {
                for x in Board::interior_cols() {
                    self.set_cell(x, y, Cell::Empty);
                }
                for yy in (0..y).rev() {
                    for x in Board::interior_cols() {
                        match self.cell(x, yy) {
                            cell @ (Cell::Full | Cell::Fading) => {
                                self.set_cell(x, yy + 1, cell);
                                self.set_cell(x, yy, Cell::Empty);
                            }
                            _ => {}
                        }
                    }
                }
                removed += 1;
            }
        }
        removed
    }

    /// Whether the settled stack has reached the top two interior rows.
    pub fn is_topped_out(&self) -> bool {
        (0..2).any(|y| Board::interior_cols().any(|x| self.cell(x, y) == Cell::Full))
    }
}
