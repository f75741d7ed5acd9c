//! Terminal backends for the engine's renderer and audio contracts.
//!
//! The renderer queues every drawing command into an in-memory byte buffer
//! while a batch is open and transmits the whole burst in one write on
//! commit, so a full simulation step reaches the terminal as a single flush.

use std::io::{self, Stdout, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor};

use skyfall_core::constants::FIELD_HEIGHT;
use skyfall_core::{AudioCue, AudioSink, CellColor, FieldRenderer};

// Screen layout. The field is drawn two characters per cell inside a
// one-character border; game row 0 (the base row) is the bottom line.
pub const FIELD_ORIGIN_COL: u16 = 2;
pub const FIELD_ORIGIN_ROW: u16 = 2;
pub const CELL_WIDTH: u16 = 2;
pub const BORDER_COL: u16 = FIELD_ORIGIN_COL - 1;
pub const BORDER_TOP_ROW: u16 = FIELD_ORIGIN_ROW - 1;
pub const BORDER_BOTTOM_ROW: u16 = FIELD_ORIGIN_ROW + FIELD_HEIGHT as u16;
pub const STATUS_ROW: u16 = BORDER_BOTTOM_ROW + 1;
pub const BANNER_ROW: u16 = STATUS_ROW + 1;
pub const HINT_ROW: u16 = STATUS_ROW + 2;

pub struct TermRenderer {
    out: Stdout,
    buf: Vec<u8>,
    batching: bool,
}

impl TermRenderer {
    pub fn new() -> Self {
        Self {
            out: io::stdout(),
            buf: Vec::with_capacity(4096),
            batching: false,
        }
    }

    fn cell_color(color: CellColor) -> Color {
        match color {
            CellColor::Empty => Color::Black,
            CellColor::Asteroid => Color::Green,
            CellColor::Projectile => Color::Red,
            CellColor::Base => Color::Yellow,
        }
    }

    fn transmit(&mut self) {
        if let Err(err) = self
            .out
            .write_all(&self.buf)
            .and_then(|()| self.out.flush())
        {
            tracing::warn!("terminal write failed: {err}");
        }
        self.buf.clear();
    }
}

impl Default for TermRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldRenderer for TermRenderer {
    fn set_cell(&mut self, x: u8, y: u8, color: CellColor) {
        let col = FIELD_ORIGIN_COL + x as u16 * CELL_WIDTH;
        let row = FIELD_ORIGIN_ROW + (FIELD_HEIGHT - 1 - y) as u16;
        // Queuing into a Vec cannot fail.
        let _ = queue!(
            self.buf,
            MoveTo(col, row),
            SetBackgroundColor(Self::cell_color(color)),
            Print("  "),
            ResetColor,
        );
        if !self.batching {
            self.transmit();
        }
    }

    fn begin_batch(&mut self) {
        self.batching = true;
    }

    fn commit_batch(&mut self) {
        self.batching = false;
        self.transmit();
    }
}

/// Rings the terminal bell when the base takes a hit; reward cues stay
/// silent.
#[derive(Clone, Copy, Debug, Default)]
pub struct BellAudio;

impl AudioSink for BellAudio {
    fn play(&mut self, cue: AudioCue) {
        if cue == AudioCue::Error {
            let mut out = io::stdout();
            let _ = out.write_all(b"\x07").and_then(|()| out.flush());
        }
    }
}
