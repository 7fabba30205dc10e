//! Headless Breakout runner.
//!
//! Plays the game with a simple autopilot that keeps the paddle under the
//! ball, then prints the final session as JSON. Useful for smoke-testing
//! level packs and configuration files without a renderer.

use std::path::PathBuf;

use anyhow::{Context, Result};
use breakout_core::controllers::PaddleCommand;
use breakout_core::entity::EntityKind;
use breakout_core::{DirectoryLevels, GameConfig, LevelLoader, Simulation, TickEvents};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Run a headless Breakout session", version)]
struct Args {
    /// JSON configuration file; defaults are used for missing fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding breakout{N}.txt level files. Embedded levels if omitted.
    #[arg(long)]
    levels: Option<PathBuf>,

    /// Maximum ticks to run.
    #[arg(long, default_value_t = 20_000)]
    ticks: u64,

    /// Log filter, e.g. `info` or `breakout_core=debug`.
    #[arg(long, default_value = "info")]
    log: String,

    /// Leave the paddle idle instead of tracking the ball.
    #[arg(long)]
    no_autopilot: bool,
}

/// Chooses the paddle command that moves it under the ball.
fn autopilot(sim: &Simulation) -> Option<PaddleCommand> {
    let arena = sim.arena();
    let ball = arena.center(arena.first_of_kind(EntityKind::Ball)?)?;
    let paddle = arena.center(arena.first_of_kind(EntityKind::Paddle)?)?;
    let dead_zone = sim.config().paddle_speed;

    Some(if ball.x < paddle.x - dead_zone {
        PaddleCommand::MoveLeft
    } else if ball.x > paddle.x + dead_zone {
        PaddleCommand::MoveRight
    } else {
        PaddleCommand::StopMoving
    })
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&args.log).context("invalid --log filter")?)
        .init();

    let config = match &args.config {
        Some(path) => GameConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::default(),
    };
    let levels = match &args.levels {
        Some(dir) => LevelLoader::new(DirectoryLevels::new(dir)),
        None => LevelLoader::default(),
    };

    let mut sim = Simulation::new(config, levels).context("starting game")?;
    let mut last_command = None;

    for _ in 0..args.ticks {
        if sim.is_finished() {
            break;
        }
        if !args.no_autopilot {
            if let Some(command) = autopilot(&sim).filter(|c| Some(*c) != last_command) {
                sim.submit(command);
                last_command = Some(command);
            }
        }

        let report = sim.step();
        if let Some(err) = &report.level_error {
            warn!(tick = report.tick, error = %err, "level rejected");
        }
        if report.events.contains(TickEvents::LEVEL_ADVANCED) {
            let view = sim.view();
            info!(
                tick = report.tick,
                level = view.current_level,
                score = view.score,
                "level cleared"
            );
        }
    }

    let view = sim.view();
    info!(
        ticks = sim.tick(),
        score = view.score,
        lives = view.lives_remaining,
        won = view.game_won,
        over = view.game_over,
        "session finished"
    );
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}
