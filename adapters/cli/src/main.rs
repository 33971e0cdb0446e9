#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line runner for Creepline levels.

mod arguments;
mod canvas;
mod config;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use creepline_core::{CellPoint, Command, Event, LevelState};
use creepline_level::{Level, LevelDefinition};
use creepline_world::{apply, query, LevelInstance};

use crate::{
    arguments::{parse_point, TowerPlacement},
    canvas::AsciiCanvas,
    config::SimulationConfig,
};

/// Plays and inspects Creepline levels without a window.
#[derive(Debug, Parser)]
#[command(name = "creepline", version, about)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Simulates a level until it ends or the tick budget runs out.
    Run(RunArgs),
    /// Validates a level file and prints a summary.
    Check {
        /// Path to the level JSON document.
        level: PathBuf,
    },
    /// Prints a generated level with escalating waves.
    Generate {
        /// Number of waves to generate.
        #[arg(long, default_value_t = 5)]
        waves: u32,
    },
}

#[derive(Debug, clap::Args)]
struct RunArgs {
    /// Path to the level JSON document.
    level: PathBuf,
    /// Optional TOML file with simulation settings.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides the maximum number of ticks.
    #[arg(long)]
    ticks: Option<u64>,
    /// Overrides the number of ticks per simulated second.
    #[arg(long)]
    tick_hz: Option<f64>,
    /// Tower to build before the invasion, written as KIND@X,Y.
    #[arg(long = "tower", value_name = "KIND@X,Y")]
    towers: Vec<TowerPlacement>,
    /// Leaves the level idle instead of starting the invasion.
    #[arg(long)]
    hold: bool,
    /// Sends the next wave early whenever no creep is alive.
    #[arg(long)]
    send_waves_early: bool,
    /// Prints the field after the run.
    #[arg(long)]
    render: bool,
    /// Prints the inspection panel of whatever lies at X,Y after the run.
    #[arg(long, value_name = "X,Y", value_parser = parse_point)]
    inspect: Option<CellPoint>,
}

fn main() -> Result<()> {
    env_logger::init();

    match Cli::parse().command {
        CliCommand::Run(args) => run(args),
        CliCommand::Check { level } => check(&level),
        CliCommand::Generate { waves } => generate(waves),
    }
}

fn load_level(path: &Path) -> Result<Level> {
    Level::load(path).with_context(|| format!("failed to load level {}", path.display()))
}

fn simulation_config(args: &RunArgs) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(ticks) = args.ticks {
        config.max_ticks = ticks;
    }
    if let Some(tick_hz) = args.tick_hz {
        config.tick_hz = tick_hz;
    }
    if args.hold {
        config.auto_start = false;
    }
    if args.send_waves_early {
        config.send_waves_early = true;
    }
    config.validate()?;
    Ok(config)
}

/// Running totals of the events a run produced.
#[derive(Debug, Default)]
struct RunTally {
    kills: u64,
    leaks: u64,
    bounty: u64,
    shots: u64,
}

impl RunTally {
    fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::CreepKilled { bounty, .. } => {
                    self.kills += 1;
                    self.bounty += bounty;
                }
                Event::CreepReachedGoal { .. } => self.leaks += 1,
                Event::ProjectileFired { .. } => self.shots += 1,
                _ => {}
            }
        }
    }
}

fn run(args: RunArgs) -> Result<()> {
    let config = simulation_config(&args)?;
    let mut level = LevelInstance::new(load_level(&args.level)?);
    let mut events = Vec::new();

    for placement in &args.towers {
        apply(
            &mut level,
            Command::PlaceTower {
                kind: placement.kind,
                cell: placement.cell,
            },
            &mut events,
        );
    }
    for event in events.drain(..) {
        if let Event::TowerPlacementRejected { kind, cell, reason } = event {
            log::warn!("could not build {kind} at {cell}: {reason:?}");
        }
    }

    if config.auto_start {
        apply(&mut level, Command::StartInvasion, &mut events);
    }

    let step = config.step()?;
    let mut tally = RunTally::default();
    for _ in 0..config.max_ticks {
        if query::state(&level).is_terminal() {
            break;
        }
        if config.send_waves_early
            && query::state(&level) == LevelState::Running
            && query::creep_count(&level) == 0
            && !query::schedule(&level).invasion_ended()
        {
            apply(&mut level, Command::SendNextWave, &mut events);
        }
        apply(&mut level, Command::Tick { dt: step }, &mut events);
        tally.record(&events);
        events.clear();
    }

    let economy = query::economy(&level);
    println!("level: {}", query::name(&level));
    println!("state: {:?}", economy.state);
    println!(
        "ticks: {} ({:.2}s simulated)",
        query::tick_index(&level),
        query::elapsed(&level).as_secs_f64()
    );
    println!(
        "wave: {}/{}",
        economy.wave,
        query::schedule(&level).wave_count()
    );
    println!("money: {}", economy.money);
    println!("lives: {}", economy.lives);
    println!("towers: {}", query::tower_count(&level));
    println!(
        "creeps: {} killed, {} leaked, {} alive",
        tally.kills,
        tally.leaks,
        query::creep_count(&level)
    );
    println!("shots fired: {}, bounty earned: {}", tally.shots, tally.bounty);

    if args.render {
        let mut canvas = AsciiCanvas::new(query::grid(&level));
        level.render(&mut canvas);
        println!("{canvas}");
    }

    if let Some(point) = args.inspect {
        match level.select_at(point) {
            Some(panel) => {
                println!("{}", panel.title);
                for line in &panel.lines {
                    println!("  {line}");
                }
                for action in &panel.actions {
                    println!("  [{action:?}]");
                }
            }
            None => println!("nothing to inspect at ({}, {})", point.column(), point.row()),
        }
    }

    Ok(())
}

fn check(path: &Path) -> Result<()> {
    let level = load_level(path)?;
    let grid = level.grid();
    println!("level: {}", level.name());
    println!("grid: {}x{}, goal {}", grid.width(), grid.height(), grid.goal());
    println!(
        "economy: {} money, {} lives",
        grid.starting_money(),
        grid.starting_lives()
    );
    println!(
        "waves: {} with {} creeps",
        level.waves().len(),
        level.creep_count()
    );
    let spawns = level
        .spawn_points()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    println!("spawn points: {spawns}");
    Ok(())
}

fn generate(waves: u32) -> Result<()> {
    let json = LevelDefinition::generated(waves)
        .to_json_pretty()
        .context("failed to serialise generated level")?;
    println!("{json}");
    Ok(())
}
