//! Recorded session input: the external driver's stimuli, one entry per
//! engine call, replayable against the same seed.

use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    MoveLeft,
    MoveRight,
    Fire,
    StepProjectiles,
    StepAsteroids,
    Restart,
}

/// Everything needed to reproduce a session: the RNG seed and the driver's
/// command stream in order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionLog {
    pub seed: u32,
    pub commands: Vec<Command>,
}
