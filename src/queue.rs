//! Piece generation: independent uniform draws with one piece of lookahead

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::tetromino::{Footprint, Tetromino};

/// Upcoming pieces for one board.
///
/// Draws are independent and uniform over the catalog, with no bag fairness.
/// The preview starts out empty, so the first [`PieceQueue::take`] draws
/// twice: once for the piece entering play and once to fill the preview.
/// Seeded queues therefore consume their RNG in a fixed, testable order.
#[derive(Debug, Clone)]
pub struct PieceQueue {
    rng: ChaCha8Rng,
    preview: Option<Footprint>,
}

impl PieceQueue {
    /// A queue seeded from OS entropy.
    pub fn new() -> Self {
        PieceQueue {
            rng: ChaCha8Rng::from_entropy(),
            preview: None,
        }
    }

    /// A queue with a reproducible draw sequence.
    pub fn with_seed(seed: u64) -> Self {
        PieceQueue {
            rng: ChaCha8Rng::seed_from_u64(seed),
            preview: None,
        }
    }

    /// The footprint the next [`PieceQueue::take`] will return, once one
    /// has been drawn.
    pub fn preview(&self) -> Option<&Footprint> {
        self.preview.as_ref()
    }

    /// Hand out the next footprint and refill the preview.
    pub fn take(&mut self) -> Footprint {
        let current = match self.preview.take() {
            Some(footprint) => footprint,
            None => self.draw(),
        };
        self.preview = Some(self.draw());
        current
    }

    fn draw(&mut self) -> Footprint {
        let index = self.rng.gen_range(0..Tetromino::ALL.len());
        Tetromino::ALL[index].footprint()
    }
}
