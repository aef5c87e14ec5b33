//! Rust Platformer -- headless runner and application entry point.
//!
//! The runner owns the frame loop and nothing else. Each frame it:
//!
//!   1. `begin_frame()` -- wait for the next fixed slot (or advance the
//!      simulated clock by one interval)
//!   2. hands the next scripted `TickInput` to `Game::tick` with the clock's
//!      monotonic milliseconds
//!   3. captures a `FrameSnapshot` and logs events, state changes and the HUD
//!
//! Input comes from a replay file when `--replay` is given and from the
//! built-in demo run otherwise. The loop ends on quit or when the input runs
//! out. Without `--realtime` the clock is simulated, so runs are reproducible.

mod collision;
mod config;
mod entities;
mod game;
mod input;
mod level;
mod levels;
mod player;
mod replay;
mod snapshot;

use std::fmt;
use std::path::PathBuf;
use std::process::ExitCode;

use config::{load_config_from_path, GameConfig};
use game::{Game, GameEvent, TickFlow};
use replay::{demo_sequence, load_replay_from_path};
use rp_core::time::FrameClock;
use snapshot::FrameSnapshot;

#[derive(Debug, Default)]
struct RunOptions {
    config_path: Option<PathBuf>,
    replay_path: Option<PathBuf>,
    realtime: bool,
}

#[derive(Debug)]
enum StartupError {
    Usage(String),
    Config(String),
    Replay(String),
    Levels(String),
}

impl StartupError {
    fn exit_code(&self) -> u8 {
        match self {
            Self::Usage(_) => 2,
            Self::Config(_) => 3,
            Self::Replay(_) => 4,
            Self::Levels(_) => 5,
        }
    }
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Usage(msg) => write!(f, "{msg}"),
            Self::Config(msg) => write!(f, "Config error: {msg}"),
            Self::Replay(msg) => write!(f, "Replay error: {msg}"),
            Self::Levels(msg) => write!(f, "Level data error: {msg}"),
        }
    }
}

fn usage() -> String {
    "Usage: cargo run -p rp_game -- [--config <path>] [--replay <path>] [--realtime]\nExample: cargo run -p rp_game -- --replay assets/replays/level1.json --realtime".to_string()
}

fn parse_args(args: &[String]) -> Result<RunOptions, StartupError> {
    let mut options = RunOptions::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().ok_or_else(|| StartupError::Usage(usage()))?;
                options.config_path = Some(PathBuf::from(path));
            }
            "--replay" => {
                let path = iter.next().ok_or_else(|| StartupError::Usage(usage()))?;
                options.replay_path = Some(PathBuf::from(path));
            }
            "--realtime" => options.realtime = true,
            "-h" | "--help" => return Err(StartupError::Usage(usage())),
            other => {
                return Err(StartupError::Usage(format!(
                    "Unknown argument '{other}'\n{}",
                    usage()
                )))
            }
        }
    }
    Ok(options)
}

fn run(options: RunOptions) -> Result<(), StartupError> {
    let config = match &options.config_path {
        Some(path) => {
            let config = load_config_from_path(path).map_err(StartupError::Config)?;
            log::info!("Config loaded: {}", path.display());
            config
        }
        None => GameConfig::default(),
    };

    let replay = match &options.replay_path {
        Some(path) => {
            let replay = load_replay_from_path(path).map_err(StartupError::Replay)?;
            log::info!(
                "Replay loaded: {} ({} frames, {} ticks)",
                path.display(),
                replay.frames.len(),
                replay.total_ticks()
            );
            replay
        }
        None => {
            log::info!("No replay given; running the built-in demo");
            demo_sequence()
        }
    };
    let inputs = replay.expanded_inputs();

    let mut clock = if options.realtime {
        FrameClock::realtime(config.viewport.fps)
    } else {
        FrameClock::simulated(config.viewport.fps)
    };

    let mut game = Game::new(config, levels::LEVELS, clock.elapsed_ms())
        .map_err(StartupError::Levels)?;
    log::info!(
        "Game ready: {} levels, {:?} pacing at {} fps",
        levels::LEVELS.len(),
        clock.mode,
        clock.target_fps
    );

    let mut last_state = game.state();
    for input in &inputs {
        clock.begin_frame();
        let now_ms = clock.elapsed_ms();

        let report = game.tick(input, now_ms);
        for event in &report.events {
            log_event(event);
        }
        if report.flow == TickFlow::Quit {
            break;
        }

        let snapshot = FrameSnapshot::capture(&game, now_ms);
        if snapshot.state != last_state {
            log::info!("{:?}: {}", snapshot.state, snapshot.hud);
            last_state = snapshot.state;
        }
        log::trace!(
            "frame {} camera_x {} player ({}, {}) {:?} | {}",
            clock.frame_count,
            snapshot.camera_x,
            snapshot.player.x,
            snapshot.player.y,
            snapshot.skin,
            snapshot.hud
        );
    }

    let summary = FrameSnapshot::capture(&game, clock.elapsed_ms());
    log::info!(
        "Run finished after {} frames ({:.1} fps avg) in {:?}: {}",
        clock.frame_count,
        clock.smoothed_fps,
        summary.state,
        summary.hud
    );
    Ok(())
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::LifeLost { cause, lives_left } => {
            log::info!("Life lost ({cause:?}), {lives_left} left");
        }
        GameEvent::GoalReached { level } => log::info!("Level {} cleared", level + 1),
        GameEvent::GameOver => log::info!("Game over"),
        GameEvent::Won => log::info!("All levels cleared"),
        other => log::debug!("{other:?}"),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Rust Platformer starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = parse_args(&args).and_then(run);
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
