//! Interactive driver: raw-mode keyboard input, step timers, HUD, and
//! session recording. The engine never schedules itself; this loop decides
//! when each advance runs and skips them while paused or after game over.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::style::Print;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};

use skyfall_core::constants::{FIELD_WIDTH, STARTING_LIVES};
use skyfall_core::effects::ScoreTally;
use skyfall_core::rng::SeededRng;
use skyfall_core::{Command, Direction, Game, ScoreBoard, SessionLog};

use crate::term::{
    BellAudio, TermRenderer, BANNER_ROW, BORDER_BOTTOM_ROW, BORDER_COL, BORDER_TOP_ROW,
    CELL_WIDTH, FIELD_ORIGIN_ROW, HINT_ROW, STATUS_ROW,
};

const PROJECTILE_TICK: Duration = Duration::from_millis(200);
const GRAVITY_TICK: Duration = Duration::from_millis(600);
const INPUT_POLL_CAP: Duration = Duration::from_millis(50);

pub struct SessionConfig {
    pub seed: u32,
    pub record: Option<PathBuf>,
}

pub fn run(config: &SessionConfig) -> Result<()> {
    enable_raw_mode().context("enable raw terminal mode")?;
    if let Err(err) = execute!(io::stdout(), EnterAlternateScreen, Hide) {
        let _ = disable_raw_mode();
        return Err(err).context("enter alternate screen");
    }

    let outcome = drive(config);

    // Restore the terminal even when the session errored out.
    let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
    let _ = disable_raw_mode();
    outcome
}

fn drive(config: &SessionConfig) -> Result<()> {
    draw_chrome()?;

    let mut game = Game::new(
        TermRenderer::new(),
        BellAudio,
        ScoreTally::new(STARTING_LIVES),
        SeededRng::new(config.seed),
    );
    let mut log = SessionLog {
        seed: config.seed,
        commands: Vec::new(),
    };
    game.initialize();
    tracing::info!(seed = config.seed, "session started");

    let mut shown_status = (-1, -1);
    let mut was_over = false;
    let mut next_projectile_step = Instant::now() + PROJECTILE_TICK;
    let mut next_gravity_step = Instant::now() + GRAVITY_TICK;

    loop {
        let now = Instant::now();
        if game.is_paused() || game.is_game_over() {
            // Hold the deadlines so unpausing does not release a burst of
            // catch-up steps.
            next_projectile_step = now + PROJECTILE_TICK;
            next_gravity_step = now + GRAVITY_TICK;
        } else {
            if now >= next_projectile_step {
                game.advance_projectiles();
                log.commands.push(Command::StepProjectiles);
                next_projectile_step = now + PROJECTILE_TICK;
            }
            if now >= next_gravity_step {
                game.advance_asteroids();
                log.commands.push(Command::StepAsteroids);
                next_gravity_step = now + GRAVITY_TICK;
            }
        }

        if game.is_game_over() && !was_over {
            was_over = true;
            tracing::info!(score = game.scoreboard().score(), "game over");
            draw_banner("game over - r restarts, q quits")?;
        }

        let status = (game.scoreboard().score(), game.scoreboard().lives());
        if status != shown_status {
            shown_status = status;
            draw_status(status.0, status.1)?;
        }

        let wait = next_projectile_step
            .min(next_gravity_step)
            .saturating_duration_since(Instant::now())
            .min(INPUT_POLL_CAP);
        if !event::poll(wait).context("poll terminal input")? {
            continue;
        }
        let Event::Key(key) = event::read().context("read terminal input")? else {
            continue;
        };
        if key.kind == KeyEventKind::Release {
            continue;
        }

        let playing = !game.is_paused() && !game.is_game_over();
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => break,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
            KeyCode::Char('p') if !game.is_game_over() => {
                let paused = !game.is_paused();
                game.set_paused(paused);
                if paused {
                    draw_banner("paused")?;
                } else {
                    clear_banner()?;
                }
            }
            KeyCode::Char('r') if game.is_game_over() => {
                *game.scoreboard_mut() = ScoreTally::new(STARTING_LIVES);
                game.initialize();
                log.commands.push(Command::Restart);
                was_over = false;
                clear_banner()?;
                tracing::info!("session restarted");
            }
            KeyCode::Left if playing => {
                game.move_base(Direction::Left);
                log.commands.push(Command::MoveLeft);
            }
            KeyCode::Right if playing => {
                game.move_base(Direction::Right);
                log.commands.push(Command::MoveRight);
            }
            KeyCode::Char(' ') if playing => {
                game.fire_projectile();
                log.commands.push(Command::Fire);
            }
            _ => {}
        }
    }

    if let Some(path) = &config.record {
        let encoded = serde_json::to_string_pretty(&log).context("encode session log")?;
        fs::write(path, encoded)
            .with_context(|| format!("write session log to {}", path.display()))?;
        tracing::info!(
            path = %path.display(),
            commands = log.commands.len(),
            "session log written"
        );
    }
    Ok(())
}

fn draw_chrome() -> Result<()> {
    let mut out = io::stdout();
    let inner = FIELD_WIDTH as usize * CELL_WIDTH as usize;
    let horizontal = format!("+{}+", "-".repeat(inner));

    execute!(
        out,
        Clear(ClearType::All),
        MoveTo(BORDER_COL + 1, 0),
        Print("s k y f a l l"),
        MoveTo(BORDER_COL, BORDER_TOP_ROW),
        Print(&horizontal),
        MoveTo(BORDER_COL, BORDER_BOTTOM_ROW),
        Print(&horizontal),
        MoveTo(BORDER_COL, HINT_ROW),
        Print("arrows move   space fires   p pauses   q quits"),
    )
    .context("draw frame chrome")?;

    for row in FIELD_ORIGIN_ROW..BORDER_BOTTOM_ROW {
        execute!(
            out,
            MoveTo(BORDER_COL, row),
            Print("|"),
            MoveTo(BORDER_COL + 1 + inner as u16, row),
            Print("|"),
        )
        .context("draw frame border")?;
    }
    out.flush().context("flush frame chrome")
}

fn draw_status(score: i32, lives: i32) -> Result<()> {
    execute!(
        io::stdout(),
        MoveTo(BORDER_COL, STATUS_ROW),
        Clear(ClearType::CurrentLine),
        Print(format!("score {score:>4}   lives {lives}")),
    )
    .context("draw status line")
}

fn draw_banner(message: &str) -> Result<()> {
    execute!(
        io::stdout(),
        MoveTo(BORDER_COL, BANNER_ROW),
        Clear(ClearType::CurrentLine),
        Print(message),
    )
    .context("draw banner")
}

fn clear_banner() -> Result<()> {
    execute!(
        io::stdout(),
        MoveTo(BORDER_COL, BANNER_ROW),
        Clear(ClearType::CurrentLine),
    )
    .context("clear banner")
}
