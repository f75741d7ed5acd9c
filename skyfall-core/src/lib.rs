#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod command;
pub mod constants;
pub mod effects;
pub mod grid;
pub mod list;
pub mod rng;
pub mod sim;

pub use command::{Command, SessionLog};
pub use effects::{AudioCue, AudioSink, CellColor, FieldRenderer, RandomSource, ScoreBoard};
pub use grid::{Direction, GridPos};
pub use sim::{replay, FieldSnapshot, Game, ReplayOutcome};
