//! A recorded session must survive a JSON round trip and replay to the exact
//! outcome the live engine produced.

use skyfall_core::sim::headless;
use skyfall_core::{replay, Command, ReplayOutcome, ScoreBoard, SessionLog};

fn scripted_commands() -> Vec<Command> {
    let mut commands = Vec::new();
    for round in 0..60 {
        commands.push(if round % 2 == 0 {
            Command::MoveLeft
        } else {
            Command::MoveRight
        });
        commands.push(Command::Fire);
        commands.push(Command::StepProjectiles);
        if round % 3 == 0 {
            commands.push(Command::StepAsteroids);
        }
    }
    commands
}

#[test]
fn session_log_round_trips_through_json() {
    let log = SessionLog {
        seed: 0x5EED_0001,
        commands: scripted_commands(),
    };

    let encoded = serde_json::to_string(&log).expect("encode session log");
    let decoded: SessionLog = serde_json::from_str(&encoded).expect("decode session log");

    assert_eq!(decoded, log);
    assert_eq!(
        replay(log.seed, &log.commands),
        replay(decoded.seed, &decoded.commands)
    );
}

#[test]
fn replay_matches_a_live_session() {
    let seed = 0xFACE_FEED;
    let mut game = headless(seed);
    let mut recorded = Vec::new();

    for command in scripted_commands() {
        if game.is_game_over() {
            break;
        }
        game.apply(command);
        recorded.push(command);
    }

    let expected = ReplayOutcome {
        frames: recorded.len() as u32,
        score: game.scoreboard().score(),
        lives: game.scoreboard().lives(),
        asteroids: game.num_asteroids(),
        projectiles: game.num_projectiles(),
        rng_state: game.rng().state(),
    };

    assert_eq!(replay(seed, &recorded), expected);
}
