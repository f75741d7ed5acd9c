//! The game state engine and its headless replay harness.

use alloc::vec::Vec;

use serde::Serialize;

use crate::command::Command;
use crate::constants::STARTING_LIVES;
use crate::effects::{NullAudio, NullRenderer, ScoreBoard, ScoreTally};
use crate::rng::SeededRng;

mod game;

pub use game::Game;

/// Read-only view of the field for drivers and tests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSnapshot {
    pub base_x: u8,
    pub paused: bool,
    pub lives: i32,
    pub asteroids: Vec<(u8, u8)>,
    pub projectiles: Vec<(u8, u8)>,
}

/// Final state of a replayed session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ReplayOutcome {
    pub frames: u32,
    pub score: i32,
    pub lives: i32,
    pub asteroids: usize,
    pub projectiles: usize,
    pub rng_state: u32,
}

pub type HeadlessGame = Game<NullRenderer, NullAudio, ScoreTally, SeededRng>;

/// Fresh engine with no-op rendering/audio and a seeded RNG, already
/// initialized.
pub fn headless(seed: u32) -> HeadlessGame {
    let mut game = Game::new(
        NullRenderer,
        NullAudio,
        ScoreTally::new(STARTING_LIVES),
        SeededRng::new(seed),
    );
    game.initialize();
    game
}

/// Re-runs a command stream against a fresh engine. Commands other than
/// `Restart` are dropped once the game is over, matching what an interactive
/// driver lets through. Same seed and commands give the same outcome.
pub fn replay(seed: u32, commands: &[Command]) -> ReplayOutcome {
    let mut game = headless(seed);
    let mut frames = 0u32;

    for &command in commands {
        match command {
            Command::Restart => {
                *game.scoreboard_mut() = ScoreTally::new(STARTING_LIVES);
                game.apply(Command::Restart);
            }
            _ if game.is_game_over() => continue,
            command => game.apply(command),
        }
        frames += 1;
    }

    ReplayOutcome {
        frames,
        score: game.scoreboard().score(),
        lives: game.scoreboard().lives(),
        asteroids: game.num_asteroids(),
        projectiles: game.num_projectiles(),
        rng_state: game.rng().state(),
    }
}
