//! Active-piece control: spawning, gravity, lateral moves, rotation
//!
//! A piece in play is its footprint plus a window anchor on the grid. The
//! board's `Moving` cells mirror the footprint at all times, and the
//! collision sweeps read those cells; there is exactly one piece per
//! board, so every `Moving` cell belongs to it.

use crate::board::{Board, Cell, GRID_WIDTH};
use crate::tetromino::{Footprint, FOOTPRINT_SIZE, rotation_moves};

/// Window anchor for freshly spawned pieces: horizontally centered, top row.
const SPAWN_X: i32 = (GRID_WIDTH as i32 - FOOTPRINT_SIZE as i32) / 2;
const SPAWN_Y: i32 = 0;

/// Lateral movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// The piece currently falling on one board, if any.
#[derive(Debug, Clone)]
pub struct ActivePiece {
    footprint: Footprint,
    x: i32,
    y: i32,
    active: bool,
}

impl ActivePiece {
    pub fn new() -> Self {
        ActivePiece {
            footprint: Footprint::default(),
            x: SPAWN_X,
            y: SPAWN_Y,
            active: false,
        }
    }

    /// Whether a piece is currently on the board.
    #[allow(dead_code)]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Put `footprint` into play at the spawn anchor, stamping its cells
    /// over whatever the grid holds there. Silently does nothing while a
    /// piece is already active.
    pub fn spawn(&mut self, board: &mut Board, footprint: Footprint) {
        if self.active {
            return;
        }
        self.footprint = footprint;
        self.x = SPAWN_X;
        self.y = SPAWN_Y;
        self.active = true;
        self.stamp(board);
    }

    /// One gravity step: settle if any cell rests on the stack or floor,
    /// otherwise translate the piece down a row. Returns whether the piece
    /// settled.
    pub fn descend(&mut self, board: &mut Board) -> bool {
        if !self.active {
            return false;
        }
        if self.landed(board) {
            self.settle(board);
            return true;
        }
        // Bottom-up so a cell never overwrites an unmoved one below it.
        for y in Board::interior_rows().rev() {
            for x in Board::interior_cols() {
                if board.cell(x, y) == Cell::Moving {
                    board.set_cell(x, y + 1, Cell::Moving);
                    board.set_cell(x, y, Cell::Empty);
                }
            }
        }
        self.y += 1;
        false
    }

    /// Try to move one column over. Returns whether a collision blocked the
    /// move, which keeps the caller's debounce primed to retry.
    pub fn shift(&mut self, board: &mut Board, direction: Direction) -> bool {
        if !self.active {
            return false;
        }
        let dx = match direction {
            Direction::Left => -1,
            Direction::Right => 1,
        };
        for y in Board::interior_rows().rev() {
            for x in Board::interior_cols() {
                if board.cell(x, y) == Cell::Moving && board.cell(x + dx, y).is_solid() {
                    return true;
                }
            }
        }
        // Sweep toward the movement direction so cells vacate before their
        // neighbor is visited.
        match direction {
            Direction::Left => {
                for y in Board::interior_rows().rev() {
                    for x in Board::interior_cols() {
                        if board.cell(x, y) == Cell::Moving {
                            board.set_cell(x - 1, y, Cell::Moving);
                            board.set_cell(x, y, Cell::Empty);
                        }
                    }
                }
            }
            Direction::Right => {
                for y in Board::interior_rows().rev() {
                    for x in Board::interior_cols().rev() {
                        if board.cell(x, y) == Cell::Moving {
                            board.set_cell(x + 1, y, Cell::Moving);
                            board.set_cell(x, y, Cell::Empty);
                        }
                    }
                }
            }
        }
        self.x += dx;
        false
    }

    /// Try to turn the piece a quarter turn. Returns whether the rotation
    /// was applied.
    ///
    /// Every occupied window cell's destination must lie inside the
    /// allocated grid and hold `Empty` or one of this piece's own `Moving`
    /// cells. A rejected rotation leaves the footprint untouched; either
    /// way the piece is re-stamped at its anchor.
    pub fn rotate(&mut self, board: &mut Board) -> bool {
        if !self.active {
            return false;
        }
        let fits = rotation_moves().all(|((sx, sy), (dx, dy))| {
            if !self.footprint.is_set(sx, sy) {
                return true;
            }
            let dst_x = self.x + dx as i32;
            let dst_y = self.y + dy as i32;
            board.contains(dst_x, dst_y)
                && matches!(board.cell(dst_x, dst_y), Cell::Empty | Cell::Moving)
        });
        if fits {
            self.footprint.rotate();
        }
        for y in Board::interior_rows().rev() {
            for x in Board::interior_cols() {
                if board.cell(x, y) == Cell::Moving {
                    board.set_cell(x, y, Cell::Empty);
                }
            }
        }
        self.stamp(board);
        fits
    }

    /// Whether any cell of the piece rests on something solid.
    fn landed(&self, board: &Board) -> bool {
        for y in Board::interior_rows().rev() {
            for x in Board::interior_cols() {
                if board.cell(x, y) == Cell::Moving && board.cell(x, y + 1).is_solid() {
                    return true;
                }
            }
        }
        false
    }

    /// Convert the whole piece to stack material in one go.
    fn settle(&mut self, board: &mut Board) {
        for y in Board::interior_rows().rev() {
            for x in Board::interior_cols() {
                if board.cell(x, y) == Cell::Moving {
                    board.set_cell(x, y, Cell::Full);
                }
            }
        }
        self.active = false;
    }

    fn stamp(&self, board: &mut Board) {
        for (bx, by) in self.footprint.cells() {
            board.set_cell(self.x + bx as i32, self.y + by as i32, Cell::Moving);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tetromino::Tetromino;

    fn moving_cells(board: &Board) -> Vec<(i32, i32)> {
        let mut cells = Vec::new();
        for y in Board::interior_rows() {
            for x in Board::interior_cols() {
                if board.cell(x, y) == Cell::Moving {
                    cells.push((x, y));
                }
            }
        }
        cells
    }

    #[test]
    fn test_spawn_stamps_four_moving_cells_for_every_shape() {
        for kind in Tetromino::ALL {
            let mut board = Board::new();
            let mut piece = ActivePiece::new();
            piece.spawn(&mut board, kind.footprint());
            assert!(piece.is_active());
            assert_eq!(moving_cells(&board).len(), 4, "{kind:?}");
        }
    }

    #[test]
    fn test_spawn_is_ignored_while_a_piece_is_active() {
        let mut board = Board::new();
        let mut piece = ActivePiece::new();
        piece.spawn(&mut board, Tetromino::O.footprint());
        let before = moving_cells(&board);
        piece.spawn(&mut board, Tetromino::I.footprint());
        assert_eq!(moving_cells(&board), before);
        assert_eq!(piece.footprint, Tetromino::O.footprint());
    }

    #[test]
    fn test_spawn_overwrites_settled_cells() {
        let mut board = Board::new();
        board.set_cell(5, 1, Cell::Full);
        let mut piece = ActivePiece::new();
        piece.spawn(&mut board, Tetromino::O.footprint());
        // the cube covers (5..=6, 1..=2) and claims the full cell
        assert_eq!(board.cell(5, 1), Cell::Moving);
    }

    #[test]
    fn test_descend_translates_then_settles_on_the_floor() {
        let mut board = Board::new();
        let mut piece = ActivePiece::new();
        piece.spawn(&mut board, Tetromino::O.footprint());
        let start = moving_cells(&board);

        assert!(!piece.descend(&mut board));
        let stepped = moving_cells(&board);
        for ((x0, y0), (x1, y1)) in start.iter().zip(&stepped) {
            assert_eq!((*x0, y0 + 1), (*x1, *y1));
        }

        // cube bottom row starts at y=2 and stops at y=18: 16 translations
        let mut translations = 1;
        while !piece.descend(&mut board) {
            translations += 1;
            assert!(translations < 32, "piece never settled");
        }
        assert_eq!(translations, 16);
        assert!(!piece.is_active());
        assert!(moving_cells(&board).is_empty(), "no partial settle");
        for (x, y) in [(5, 17), (6, 17), (5, 18), (6, 18)] {
            assert_eq!(board.cell(x, y), Cell::Full);
        }
    }

    #[test]
    fn test_descend_settles_on_stack_material() {
        let mut board = Board::new();
        board.set_cell(5, 3, Cell::Full);
        let mut piece = ActivePiece::new();
        piece.spawn(&mut board, Tetromino::O.footprint());
        // cube bottom cells sit at y=2, directly above the full cell
        assert!(piece.descend(&mut board));
        assert_eq!(board.cell(5, 1), Cell::Full);
        assert_eq!(board.cell(6, 1), Cell::Full);
        assert_eq!(board.cell(5, 2), Cell::Full);
        assert_eq!(board.cell(6, 2), Cell::Full);
    }

    #[test]
    fn test_shift_walks_to_the_wall_and_reports_the_collision() {
        let mut board = Board::new();
        let mut piece = ActivePiece::new();
        piece.spawn(&mut board, Tetromino::I.footprint());
        // bar occupies x 4..=7 on row 1
        for _ in 0..3 {
            assert!(!piece.shift(&mut board, Direction::Left));
        }
        assert_eq!(
            moving_cells(&board),
            vec![(1, 1), (2, 1), (3, 1), (4, 1)],
            "bar flush against the left wall"
        );
        assert!(piece.shift(&mut board, Direction::Left), "wall blocks");
        assert_eq!(moving_cells(&board), vec![(1, 1), (2, 1), (3, 1), (4, 1)]);

        for _ in 0..6 {
            assert!(!piece.shift(&mut board, Direction::Right));
        }
        assert_eq!(moving_cells(&board), vec![(7, 1), (8, 1), (9, 1), (10, 1)]);
        assert!(piece.shift(&mut board, Direction::Right), "wall blocks");
    }

    #[test]
    fn test_shift_blocked_by_settled_material() {
        let mut board = Board::new();
        board.set_cell(3, 1, Cell::Full);
        let mut piece = ActivePiece::new();
        piece.spawn(&mut board, Tetromino::I.footprint());
        assert!(piece.shift(&mut board, Direction::Left));
        assert_eq!(moving_cells(&board), vec![(4, 1), (5, 1), (6, 1), (7, 1)]);
        assert_eq!(board.cell(3, 1), Cell::Full);
    }

    #[test]
    fn test_rotation_applies_on_open_ground() {
        let mut board = Board::new();
        let mut piece = ActivePiece::new();
        piece.spawn(&mut board, Tetromino::I.footprint());
        assert!(piece.rotate(&mut board));
        // horizontal bar at anchor (4, 0) turns into the column at x=5
        assert_eq!(moving_cells(&board), vec![(5, 0), (5, 1), (5, 2), (5, 3)]);
    }

    #[test]
    fn test_rotation_rejected_by_settled_material_changes_nothing() {
        let mut board = Board::new();
        board.set_cell(5, 3, Cell::Full);
        let mut piece = ActivePiece::new();
        piece.spawn(&mut board, Tetromino::I.footprint());
        let footprint_before = piece.footprint;
        assert!(!piece.rotate(&mut board), "column would hit the stack");
        assert_eq!(piece.footprint, footprint_before);
        assert_eq!(moving_cells(&board), vec![(4, 1), (5, 1), (6, 1), (7, 1)]);
        assert_eq!(board.cell(5, 3), Cell::Full);
    }

    #[test]
    fn test_rotation_rejected_on_the_floor() {
        let mut board = Board::new();
        let mut piece = ActivePiece::new();
        piece.spawn(&mut board, Tetromino::I.footprint());
        for _ in 0..17 {
            assert!(!piece.descend(&mut board));
        }
        // the column form would poke through the floor
        assert!(!piece.rotate(&mut board));
        assert_eq!(moving_cells(&board), vec![(4, 18), (5, 18), (6, 18), (7, 18)]);
        assert!(piece.is_active());
    }

    #[test]
    fn test_operations_without_an_active_piece_are_no_ops() {
        let mut board = Board::new();
        let mut piece = ActivePiece::new();
        assert!(!piece.descend(&mut board));
        assert!(!piece.shift(&mut board, Direction::Left));
        assert!(!piece.rotate(&mut board));
        assert_eq!(board, Board::new());
    }
}
