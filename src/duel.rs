//! Two sessions running side by side, with the pause and restart keys
//! that act on the pair.

use tracing::{debug, info};

use crate::game::{Game, Phase, PlayerKeys};

/// Number of simultaneous boards.
pub const MAX_PLAYERS: usize = 2;

/// Everything the frontend sampled between two ticks.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    pub players: [PlayerKeys; MAX_PLAYERS],
    pub pause_pressed: bool,
    pub restart_pressed: bool,
    pub quit: bool,
}

/// Both boards plus the shared pause flag.
pub struct Duel {
    games: [Game; MAX_PLAYERS],
    paused: bool,
}

impl Duel {
    pub fn new() -> Self {
        Self {
            games: [Game::new(), Game::new()],
            paused: false,
        }
    }

    /// Both sessions with deterministic piece sequences.
    #[allow(dead_code)]
    pub fn with_seeds(seeds: [u64; MAX_PLAYERS]) -> Self {
        Self {
            games: seeds.map(Game::with_seed),
            paused: false,
        }
    }

    pub fn games(&self) -> &[Game; MAX_PLAYERS] {
        &self.games
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Advance both sessions by one tick.
    pub fn update(&mut self, input: &FrameInput) {
        // Polled once per tick for the pair; a per-board poll would toggle
        // the flag twice and land back where it started.
        if input.pause_pressed {
            self.paused = !self.paused;
        }

        for (index, game) in self.games.iter_mut().enumerate() {
            if game.phase() == Phase::GameOver {
                if input.restart_pressed {
                    game.restart();
                    // Coming back from game over also lifts the pause.
                    self.paused = false;
                    info!("Player {} restarted their board", index + 1);
                }
            } else if !self.paused {
                let before = game.lines();
                game.update(&input.players[index]);
                let cleared = game.lines() - before;
                if cleared > 0 {
                    debug!(
                        "Player {} cleared {} row(s), {} total",
                        index + 1,
                        cleared,
                        game.lines()
                    );
                }
                if game.phase() == Phase::GameOver {
                    info!("Player {} topped out", index + 1);
                }
            }
        }
    }
}

impl Default for Duel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GRAVITY_DELAY;

    #[test]
    fn test_input_reaches_only_its_own_board() {
        let mut duel = Duel::with_seeds([1, 2]);
        duel.update(&FrameInput::default());

        let mut input = FrameInput::default();
        input.players[0].left_pressed = true;
        input.players[0].left_held = true;
        let one_before = duel.games()[0].board().clone();
        let two_before = duel.games()[1].board().clone();
        duel.update(&input);

        assert_ne!(*duel.games()[0].board(), one_before);
        assert_eq!(*duel.games()[1].board(), two_before);
    }

    #[test]
    fn test_pause_freezes_both_boards_until_pressed_again() {
        let mut duel = Duel::with_seeds([1, 2]);
        duel.update(&FrameInput::default());

        let pause = FrameInput {
            pause_pressed: true,
            ..Default::default()
        };
        duel.update(&pause);
        assert!(duel.is_paused());

        let one = duel.games()[0].board().clone();
        let two = duel.games()[1].board().clone();
        let idle = FrameInput::default();
        for _ in 0..2 * GRAVITY_DELAY {
            duel.update(&idle);
        }
        assert_eq!(*duel.games()[0].board(), one);
        assert_eq!(*duel.games()[1].board(), two);

        duel.update(&pause);
        assert!(!duel.is_paused());
    }

    #[test]
    fn test_restart_after_top_out_also_lifts_the_pause() {
        let mut duel = Duel::with_seeds([1, 2]);
        let mut down = FrameInput::default();
        down.players[0].down_held = true;

        let mut ticks = 0;
        while duel.games()[0].phase() != Phase::GameOver {
            duel.update(&down);
            ticks += 1;
            assert!(ticks <= 20_000, "board never topped out");
        }

        duel.update(&FrameInput {
            pause_pressed: true,
            ..Default::default()
        });
        assert!(duel.is_paused());

        duel.update(&FrameInput {
            restart_pressed: true,
            ..Default::default()
        });
        assert!(!duel.is_paused());
        assert_eq!(duel.games()[0].phase(), Phase::Spawning);
        assert_eq!(duel.games()[0].lines(), 0);
    }
}
