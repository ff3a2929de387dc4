//! Single-board session: the spawn/fall/clear state machine and the
//! tick counters that pace it.

use crate::board::Board;
use crate::piece::{ActivePiece, Direction};
use crate::queue::PieceQueue;
use crate::tetromino::Footprint;

/// Ticks between gravity steps.
pub const GRAVITY_DELAY: u32 = 30;
/// Ticks between lateral steps while a direction is held.
pub const LATERAL_DELAY: u32 = 10;
/// Ticks between rotations while the rotate key is held.
pub const TURN_DELAY: u32 = 12;
/// Ticks of piece lifetime before fast fall engages.
pub const FAST_FALL_GRACE: u32 = 30;
/// Ticks a completed row flashes before it collapses.
pub const FADE_TICKS: u32 = 33;
/// Period of the clear-animation flicker, in ticks.
const FLICKER_PERIOD: u32 = 8;

/// One player's controls, sampled once per tick.
///
/// `*_pressed` reports a fresh key-down since the previous tick, `*_held`
/// reports the key still being down. A tap between ticks sets both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerKeys {
    pub left_pressed: bool,
    pub left_held: bool,
    pub right_pressed: bool,
    pub right_held: bool,
    pub rotate_pressed: bool,
    pub rotate_held: bool,
    pub down_held: bool,
}

/// Where a session is in its spawn/fall/clear cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The queued footprint is stamped on the next tick.
    Spawning,
    /// A piece is live on the board and input applies.
    Falling,
    /// Completed rows are flashing before they collapse.
    ClearAnimating,
    /// The stack reached the top; only a restart leaves this state.
    GameOver,
}

/// A single board, its active piece, and the counters that pace them.
pub struct Game {
    board: Board,
    piece: ActivePiece,
    queue: PieceQueue,
    phase: Phase,
    /// Ticks since the last gravity step.
    gravity_counter: u32,
    /// Ticks since the last lateral step.
    lateral_counter: u32,
    /// Ticks since the last rotation.
    turn_counter: u32,
    /// Ticks since the current piece spawned.
    fast_fall_counter: u32,
    /// Ticks the current clear animation has been running.
    fade_counter: u32,
    lines: u32,
    level: u32,
}

impl Game {
    /// Create a session with a randomized piece sequence.
    pub fn new() -> Self {
        Self::with_queue(PieceQueue::new())
    }

    /// Create a session with a deterministic piece sequence.
    #[allow(dead_code)]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_queue(PieceQueue::with_seed(seed))
    }

    fn with_queue(queue: PieceQueue) -> Self {
        Self {
            board: Board::new(),
            piece: ActivePiece::new(),
            queue,
            phase: Phase::Spawning,
            gravity_counter: 0,
            lateral_counter: 0,
            turn_counter: 0,
            fast_fall_counter: 0,
            fade_counter: 0,
            lines: 0,
            level: 1,
        }
    }

    /// Throw the session away and start over with a fresh piece sequence.
    pub fn restart(&mut self) {
        *self = Self::new();
    }

    /// Board to draw.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Footprint waiting in the queue, once one has been revealed.
    pub fn preview(&self) -> Option<&Footprint> {
        self.queue.preview()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Rows cleared since the session started.
    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Whether fading rows draw in the accent color on this tick.
    pub fn fade_flash_on(&self) -> bool {
        self.fade_counter % FLICKER_PERIOD < FLICKER_PERIOD / 2
    }

    /// Advance the session by one fixed tick.
    pub fn update(&mut self, keys: &PlayerKeys) {
        let was_clearing = self.phase == Phase::ClearAnimating;

        match self.phase {
            Phase::GameOver => return,
            Phase::Spawning => self.spawn_tick(),
            Phase::Falling => self.falling_tick(keys),
            Phase::ClearAnimating => self.fade_tick(),
        }

        // Rows turned Fading this tick no longer count as stack material,
        // so ticks spent in the clear animation are skipped.
        if !was_clearing && self.board.is_topped_out() {
            self.phase = Phase::GameOver;
        }
    }

    /// Stamp the queued footprint at the spawn anchor.
    fn spawn_tick(&mut self) {
        let footprint = self.queue.take();
        self.piece.spawn(&mut self.board, footprint);
        // Only the fast-fall grace restarts here; the other counters
        // carry across pieces.
        self.fast_fall_counter = 0;
        self.phase = Phase::Falling;
    }

    /// One tick of live piece control: gravity, then lateral, then rotation.
    fn falling_tick(&mut self, keys: &PlayerKeys) {
        self.fast_fall_counter += 1;
        self.gravity_counter += 1;
        self.lateral_counter += 1;
        self.turn_counter += 1;

        // A fresh press primes its counter so the move lands this tick
        // instead of waiting out the repeat delay.
        if keys.left_pressed || keys.right_pressed {
            self.lateral_counter = LATERAL_DELAY;
        }
        if keys.rotate_pressed {
            self.turn_counter = TURN_DELAY;
        }
        if keys.down_held && self.fast_fall_counter >= FAST_FALL_GRACE {
            self.gravity_counter += GRAVITY_DELAY;
        }

        if self.gravity_counter >= GRAVITY_DELAY {
            if self.piece.descend(&mut self.board) {
                if self.board.mark_complete_rows() {
                    self.fade_counter = 0;
                    self.phase = Phase::ClearAnimating;
                } else {
                    self.phase = Phase::Spawning;
                }
            }
            self.gravity_counter = 0;
        }

        if self.lateral_counter >= LATERAL_DELAY {
            let collided = if keys.left_held {
                self.piece.shift(&mut self.board, Direction::Left)
            } else if keys.right_held {
                self.piece.shift(&mut self.board, Direction::Right)
            } else {
                false
            };
            // A blocked shift keeps the counter primed, so the piece slides
            // over on the first tick the way is clear.
            if !collided {
                self.lateral_counter = 0;
            }
        }

        if self.turn_counter >= TURN_DELAY && keys.rotate_held && self.piece.rotate(&mut self.board)
        {
            self.turn_counter = 0;
        }
    }

    /// One tick of the clear animation; collapse once the flash has run out.
    fn fade_tick(&mut self) {
        self.fade_counter += 1;
        if self.fade_counter >= FADE_TICKS {
            self.lines += self.board.collapse_marked_rows();
            self.fade_counter = 0;
            self.phase = Phase::Spawning;
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
