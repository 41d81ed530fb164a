use std::path::PathBuf;

use clap::Parser;
use titanmind::app::{self, ArenaConfig};

/// Run a headless titan arena.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// RNG seed; the same seed replays the same run
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Simulated seconds to run
    #[arg(short, long, default_value_t = 60.0)]
    duration: f64,

    /// Number of titans
    #[arg(long, default_value_t = 12)]
    titans: usize,

    /// Number of humans
    #[arg(long, default_value_t = 200)]
    humans: usize,

    /// Number of boulders scattered around the arena
    #[arg(long, default_value_t = 40)]
    obstacles: usize,

    /// Titan behaviour profile (RON); built-in default when omitted
    #[arg(short, long)]
    profile: Option<PathBuf>,

    /// Pace the simulation against the wall clock
    #[arg(long)]
    realtime: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    log::info!("titanmind starting up");

    let config = ArenaConfig {
        seed: args.seed,
        duration: args.duration,
        titans: args.titans,
        humans: args.humans,
        obstacles: args.obstacles,
        profile: args.profile,
        realtime: args.realtime,
    };
    app::run(&config)?;
    Ok(())
}
