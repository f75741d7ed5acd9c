//! Game constants for the 8x16 defense field.

// Field dimensions
pub const FIELD_WIDTH: u8 = 8;
pub const FIELD_HEIGHT: u8 = 16;

// Entity caps
pub const PROJECTILE_LIMIT: usize = 4;
pub const ASTEROID_CAP: usize = 20;

// Base station
pub const BASE_START_X: u8 = 3;
pub const PROJECTILE_SPAWN_ROW: u8 = 2;

// Spawning
// Initial asteroids stay out of the lowest three rows so the base starts
// with breathing room; respawns re-enter at the top of the field.
pub const INITIAL_CLEAR_ROWS: u8 = 3;
pub const RESPAWN_MIN_ROW: u8 = FIELD_HEIGHT - 1;
pub const SPAWN_ATTEMPT_LIMIT: u32 = 8 * FIELD_HEIGHT as u32;

// Starting state
pub const STARTING_LIVES: i32 = 3;
