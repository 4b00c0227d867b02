//! Trashdroids command-line runner.
//!
//! Usage:
//!   trashdroids --mode single --seed 7
//!   trashdroids --mode versus --config match.toml --realtime
//!   RUST_LOG=debug trashdroids --ticks 600

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use log::{error, info, warn};

use trashdroids_app::autopilot::Autopilot;
use trashdroids_app::game_loop::TICK_DURATION;
use trashdroids_app::state::{AppError, AppState};
use trashdroids_core::commands::PlayerCommand;
use trashdroids_core::config::MatchConfig;
use trashdroids_core::enums::{GamePhase, PlayerSlot};
use trashdroids_core::state::GameStateSnapshot;
use trashdroids_sim::{SimConfig, SimulationEngine};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    Single,
    Versus,
}

#[derive(Parser)]
#[command(name = "trashdroids")]
#[command(about = "Run a Trashdroids match headless with scripted pilots")]
struct Args {
    /// TOML file with match parameters for the chosen mode
    #[arg(long)]
    config: Option<PathBuf>,
    /// RNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
    #[arg(long, value_enum, default_value_t = Mode::Single)]
    mode: Mode,
    /// Give up after this many ticks
    #[arg(long, default_value_t = 60 * 60 * 5)]
    ticks: u64,
    /// Pace the match on the game loop thread instead of running flat out
    #[arg(long)]
    realtime: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match run(&args) {
        Ok(snapshot) => {
            report(&snapshot);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<GameStateSnapshot, AppError> {
    let mut config = SimConfig {
        seed: args.seed,
        ..Default::default()
    };
    if let Some(path) = &args.config {
        let loaded = MatchConfig::load(path)?;
        info!("loaded match config from {}", path.display());
        match args.mode {
            Mode::Single => config.single_player = loaded,
            Mode::Versus => config.versus = loaded,
        }
    }

    let mut start = vec![PlayerCommand::Confirm];
    if args.mode == Mode::Versus {
        start.push(PlayerCommand::MenuDown);
    }
    start.push(PlayerCommand::Confirm);

    let pilots: Vec<Autopilot> = match args.mode {
        Mode::Single => vec![Autopilot::new(PlayerSlot::One)],
        Mode::Versus => vec![Autopilot::new(PlayerSlot::One), Autopilot::new(PlayerSlot::Two)],
    };

    if args.realtime {
        run_realtime(config, start, &pilots, args.ticks)
    } else {
        Ok(run_headless(config, start, &pilots, args.ticks))
    }
}

/// Tick the engine flat out on this thread.
fn run_headless(
    config: SimConfig,
    start: Vec<PlayerCommand>,
    pilots: &[Autopilot],
    max_ticks: u64,
) -> GameStateSnapshot {
    let mut engine = SimulationEngine::new(config);
    engine.queue_commands(start);
    let mut snapshot = engine.tick();

    while snapshot.time.tick < max_ticks && snapshot.phase.in_match() {
        for pilot in pilots {
            engine.queue_command(PlayerCommand::SetControls {
                slot: pilot.slot(),
                controls: pilot.controls(&snapshot),
            });
        }
        snapshot = engine.tick();
    }
    if snapshot.phase.in_match() {
        warn!("stopped after {} ticks without a result", snapshot.time.tick);
    }
    snapshot
}

/// Drive the paced game loop thread from polled snapshots.
fn run_realtime(
    config: SimConfig,
    start: Vec<PlayerCommand>,
    pilots: &[Autopilot],
    max_ticks: u64,
) -> Result<GameStateSnapshot, AppError> {
    let state = AppState::new();
    state.start(config)?;
    for command in start {
        state.send_command(command)?;
    }

    let mut last_tick = None;
    let snapshot = loop {
        std::thread::sleep(TICK_DURATION);
        let Some(snapshot) = state.snapshot()? else {
            continue;
        };
        if last_tick == Some(snapshot.time.tick) {
            if state.is_finished()? {
                break snapshot;
            }
            continue;
        }
        last_tick = Some(snapshot.time.tick);

        if matches!(snapshot.phase, GamePhase::Postgame(_)) {
            break snapshot;
        }
        if snapshot.time.tick >= max_ticks {
            warn!("stopped after {} ticks without a result", snapshot.time.tick);
            break snapshot;
        }
        if snapshot.last_error.is_some() && snapshot.phase == GamePhase::Menu {
            break snapshot;
        }
        for pilot in pilots {
            state.send_command(PlayerCommand::SetControls {
                slot: pilot.slot(),
                controls: pilot.controls(&snapshot),
            })?;
        }
    };

    state.shutdown()?;
    Ok(snapshot)
}

fn report(snapshot: &GameStateSnapshot) {
    if let Some(err) = &snapshot.last_error {
        warn!("match could not start: {err}");
    }
    match &snapshot.summary {
        Some(summary) => match serde_json::to_string_pretty(summary) {
            Ok(json) => println!("{json}"),
            Err(err) => error!("failed to encode summary: {err}"),
        },
        None => println!(
            "no result after {} ticks (phase {:?})",
            snapshot.time.tick, snapshot.phase
        ),
    }
}
