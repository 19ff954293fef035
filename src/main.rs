//! Titan Sim entry point
//!
//! Headless fuzz runs of the movement simulation: one seeded run, or a batch of
//! independent runs with seeds derived from a master seed.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;

use titan_sim::level::demo;
use titan_sim::platform::{FramePacedLoop, GameLoop, VirtualLoop};
use titan_sim::sim::{
    FrameTick, GameState, RunSummary, Scheduler, SimDriver, SimulationContext, run,
};
use titan_sim::window::Dimension;
use titan_sim::{GameOptions, SimError, SimOptions, persistence};

#[derive(Debug, Parser)]
#[command(
    name = "titan-sim",
    version,
    about = "Deterministic headless runs of the titan movement simulation"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// One seeded run driven by random key presses
    Run(RunArgs),
    /// Many independent seeded runs
    Batch(BatchArgs),
    /// Write the built-in level set as JSON
    ExportDemo {
        path: PathBuf,
    },
}

#[derive(Debug, Args)]
struct SetupArgs {
    #[arg(long, help = "Level set JSON; the built-in demo set when omitted")]
    levels: Option<PathBuf>,
    #[arg(long, help = "Game options JSON")]
    config: Option<PathBuf>,
    #[arg(long, help = "Draw game options from the seeded generator")]
    randomize: bool,
    #[arg(long, default_value_t = 1000, help = "Stop after this many ticks (0 runs until :q)")]
    until: u64,
}

#[derive(Debug, Args)]
struct RunArgs {
    #[arg(long, default_value_t = 0)]
    seed: u32,
    #[arg(long, help = "Pace frames on the wall clock instead of virtual time")]
    realtime: bool,
    #[command(flatten)]
    setup: SetupArgs,
}

#[derive(Debug, Args)]
struct BatchArgs {
    #[arg(long, default_value_t = 0, help = "Master seed the per-run seeds derive from")]
    seed: u64,
    #[arg(long, default_value_t = 16)]
    runs: u32,
    #[command(flatten)]
    setup: SetupArgs,
}

fn build_state(seed: u32, setup: &SetupArgs, realtime: bool) -> Result<GameState, SimError> {
    let mut ctx = if realtime {
        SimulationContext::realtime(seed)
    } else {
        SimulationContext::seeded(seed)
    };

    let opts = match &setup.config {
        Some(path) => GameOptions::load(path)?,
        None if setup.randomize => GameOptions::randomized(&mut ctx.rng),
        None => GameOptions::default(),
    };
    let levels = match &setup.levels {
        Some(path) => persistence::load(path, &mut ctx.ids)?,
        None => demo::level_set(&mut ctx.ids)?,
    };

    Ok(GameState::new(opts, levels, ctx).with_dimension(Dimension::headless()))
}

fn simulate(seed: u32, setup: &SetupArgs, realtime: bool) -> Result<RunSummary, SimError> {
    let mut state = build_state(seed, setup, realtime)?;
    let mut driver = SimDriver::new(SimOptions::default());
    let mut scheduler = Scheduler::standard();
    let mut game_loop: Box<dyn GameLoop> = if realtime {
        Box::new(FramePacedLoop)
    } else {
        Box::new(VirtualLoop)
    };

    log::info!(
        "seed {}: frame {}ms, slice {}ms, level set '{}'",
        seed,
        state.opts.frame_time_ms,
        state.opts.tick_time_ms,
        state.levels.title
    );
    let mut ticks: [&mut dyn FrameTick; 2] = [&mut driver, &mut scheduler];
    run(&mut state, game_loop.as_mut(), &mut ticks, setup.until)
}

fn print_summary(seed: u32, summary: &RunSummary) {
    println!(
        "seed {:>10}  ticks {:>7}  {:?}  level {}  at ({:.3}, {:.3})  deaths {}",
        seed,
        summary.ticks,
        summary.reason,
        summary.level,
        summary.position.x,
        summary.position.y,
        summary.deaths
    );
}

fn batch(args: &BatchArgs) -> Result<(), SimError> {
    let mut seeds = Pcg32::seed_from_u64(args.seed);
    let mut failures = 0u32;
    for _ in 0..args.runs {
        let seed = seeds.next_u32();
        match simulate(seed, &args.setup, false) {
            Ok(summary) => print_summary(seed, &summary),
            Err(e) => {
                failures += 1;
                log::error!("seed {}: {}", seed, e);
                println!("seed {:>10}  failed: {}", seed, e);
            }
        }
    }
    log::info!("batch done: {} runs, {} failed", args.runs, failures);
    if failures > 0 {
        return Err(SimError::BatchFailed {
            failed: failures,
            runs: args.runs,
        });
    }
    Ok(())
}

fn export_demo(path: &Path) -> Result<(), SimError> {
    let set = demo::level_set(&mut titan_sim::sim::IdAllocator::new())?;
    persistence::save(&set, path)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = match &cli.command {
        Command::Run(args) => simulate(args.seed, &args.setup, args.realtime)
            .map(|summary| print_summary(args.seed, &summary)),
        Command::Batch(args) => batch(args),
        Command::ExportDemo { path } => export_demo(path),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch_args(levels: Option<PathBuf>) -> BatchArgs {
        BatchArgs {
            seed: 7,
            runs: 3,
            setup: SetupArgs {
                levels,
                config: None,
                randomize: false,
                until: 20,
            },
        }
    }

    #[test]
    fn batch_succeeds_on_the_demo_set() {
        assert!(batch(&batch_args(None)).is_ok());
    }

    #[test]
    fn batch_with_failed_runs_is_an_error() {
        let missing = std::env::temp_dir().join("titan-sim-no-such-levels.json");
        let err = batch(&batch_args(Some(missing))).unwrap_err();
        assert!(matches!(err, SimError::BatchFailed { failed: 3, runs: 3 }));
    }
}
