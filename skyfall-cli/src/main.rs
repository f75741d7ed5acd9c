use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use skyfall_core::{replay, SessionLog};

use crate::session::{run, SessionConfig};

mod session;
mod term;

#[derive(Parser, Debug)]
#[command(name = "skyfall")]
#[command(about = "Terminal build of the 8x16 asteroid-defense game")]
struct Cli {
    /// RNG seed for the session; taken from the clock when omitted
    #[arg(long)]
    seed: Option<u32>,
    /// Write the finished session's command log as JSON
    #[arg(long)]
    record: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Re-run a recorded session headlessly and print the outcome
    Replay {
        /// Session log produced by --record
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Replay { input }) => replay_session(&input),
        None => {
            let seed = cli.seed.unwrap_or_else(clock_seed);
            run(&SessionConfig {
                seed,
                record: cli.record,
            })
        }
    }
}

fn replay_session(input: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("read session log {}", input.display()))?;
    let log: SessionLog = serde_json::from_str(&raw).context("parse session log")?;

    let outcome = replay(log.seed, &log.commands);
    tracing::info!(seed = log.seed, frames = outcome.frames, "replay finished");
    println!(
        "{}",
        serde_json::to_string_pretty(&outcome).context("encode replay outcome")?
    );
    Ok(())
}

fn clock_seed() -> u32 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.subsec_nanos())
        .unwrap_or(0);
    nanos ^ std::process::id().rotate_left(16)
}
