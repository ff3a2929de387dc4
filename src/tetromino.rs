//! Shape catalog and rotation geometry
//!
//! Shapes are fixed 4x4 footprints. Rotation does not track an orientation
//! index; it permutes the footprint's cells in place, so a piece in play is
//! nothing but its current footprint.

/// Side length of the footprint window.
pub const FOOTPRINT_SIZE: usize = 4;

/// The 7 shape kinds, named by the usual letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tetromino {
    O, // cube
    L,
    J, // mirrored L
    I, // bar
    T,
    S,
    Z, // mirrored S
}

impl Tetromino {
    /// Every kind, in draw-index order (the generator picks by index).
    pub const ALL: [Tetromino; 7] = [
        Tetromino::O,
        Tetromino::L,
        Tetromino::J,
        Tetromino::I,
        Tetromino::T,
        Tetromino::S,
        Tetromino::Z,
    ];

    /// The spawn-orientation footprint, given as (x, y) cells of the window.
    pub fn footprint(self) -> Footprint {
        let cells = match self {
            Tetromino::O => [(1, 1), (2, 1), (1, 2), (2, 2)],
            Tetromino::L => [(1, 0), (1, 1), (1, 2), (2, 2)],
            Tetromino::J => [(2, 0), (2, 1), (1, 2), (2, 2)],
            Tetromino::I => [(0, 1), (1, 1), (2, 1), (3, 1)],
            Tetromino::T => [(1, 0), (1, 1), (1, 2), (2, 1)],
            Tetromino::S => [(1, 1), (2, 1), (2, 2), (3, 2)],
            Tetromino::Z => [(2, 1), (3, 1), (1, 2), (2, 2)],
        };
        Footprint::from_cells(cells)
    }
}

/// The quarter-turn permutation of the window, written as four 4-cycles.
///
/// Within each cycle the content of `cycle[k + 1]` moves to `cycle[k]`, and
/// `cycle[0]` wraps around to `cycle[3]`. The same table drives both the
/// in-place rotation of a footprint and the collision probing of a rotation
/// attempt against the board.
pub const ROTATION_CYCLES: [[(usize, usize); 4]; 4] = [
    [(0, 0), (3, 0), (3, 3), (0, 3)], // corners
    [(1, 0), (3, 1), (2, 3), (0, 2)],
    [(2, 0), (3, 2), (1, 3), (0, 1)],
    [(1, 1), (2, 1), (2, 2), (1, 2)], // center block
];

/// Every (source, destination) move the rotation performs, in cycle order.
pub fn rotation_moves() -> impl Iterator<Item = ((usize, usize), (usize, usize))> {
    ROTATION_CYCLES
        .iter()
        .flat_map(|cycle| (0..4).map(move |k| (cycle[(k + 1) % 4], cycle[k])))
}

/// A shape at its current orientation: a 4x4 occupancy window.
///
/// Cells are addressed as (x, y) with y growing downward, matching the
/// board. A default footprint is entirely empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Footprint {
    rows: [[bool; FOOTPRINT_SIZE]; FOOTPRINT_SIZE],
}

impl Footprint {
    fn from_cells(cells: [(usize, usize); 4]) -> Self {
        let mut rows = [[false; FOOTPRINT_SIZE]; FOOTPRINT_SIZE];
        for (x, y) in cells {
            rows[y][x] = true;
        }
        Footprint { rows }
    }

    /// Whether window cell (x, y) is occupied.
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        self.rows[y][x]
    }

    /// The occupied window cells, row by row.
    pub fn cells(self) -> impl Iterator<Item = (usize, usize)> {
        (0..FOOTPRINT_SIZE).flat_map(move |y| {
            (0..FOOTPRINT_SIZE).filter_map(move |x| self.rows[y][x].then_some((x, y)))
        })
    }

    /// Turn the window a quarter turn in place.
    pub fn rotate(&mut self) {
        for cycle in ROTATION_CYCLES {
            let (x0, y0) = cycle[0];
            let kept = self.rows[y0][x0];
            for k in 0..3 {
                let (dx, dy) = cycle[k];
                let (sx, sy) = cycle[k + 1];
                self.rows[dy][dx] = self.rows[sy][sx];
            }
            let (x3, y3) = cycle[3];
            self.rows[y3][x3] = kept;
        }
    }
}
