use std::path::PathBuf;

use anyhow::Context;
use instant::Instant;

use crate::ai::BehaviorProfile;
use crate::debug::Census;
use crate::ecs::systems::{self, TickContext};
use crate::obstacles::ObstacleField;
use crate::titan;

/// Target simulation tick rate (seconds per tick).
const TICK_RATE: f64 = 1.0 / 60.0;
/// Max accumulated time before we clamp (prevents spiral of death).
const MAX_ACCUMULATOR: f64 = 0.25;
/// Simulated frame length when not pacing against the wall clock.
const FAST_FRAME: f64 = 1.0 / 30.0;
/// How often to log statistics (simulated seconds).
const STATS_LOG_INTERVAL: f64 = 5.0;
/// Spatial hash cell size, on the order of a titan's detection radius.
const SPATIAL_CELL_SIZE: f32 = 128.0;
/// Spatial hash table size (prime-ish for good distribution).
const SPATIAL_TABLE_SIZE: usize = 1024;
/// Spawn disc radius for titans and humans.
const SPAWN_RADIUS: f32 = 900.0;

/// What to run.
#[derive(Debug, Clone)]
pub struct ArenaConfig {
    pub seed: u64,
    /// Simulated seconds.
    pub duration: f64,
    pub titans: usize,
    pub humans: usize,
    pub obstacles: usize,
    pub profile: Option<PathBuf>,
    /// Pace ticks against the wall clock instead of running flat out.
    pub realtime: bool,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            duration: 60.0,
            titans: 12,
            humans: 200,
            obstacles: 40,
            profile: None,
            realtime: false,
        }
    }
}

/// End-of-run tallies.
#[derive(Debug, Clone)]
pub struct ArenaReport {
    pub ticks: u64,
    pub census: Census,
}

// ---------------------------------------------------------------------------
// Frame timing
// ---------------------------------------------------------------------------

struct FrameStats {
    tick_count: u64,
    last_log_sim_time: f64,
    last_log_wall: Instant,
    ticks_since_log: u32,
}

impl FrameStats {
    fn new() -> Self {
        Self {
            tick_count: 0,
            last_log_sim_time: 0.0,
            last_log_wall: Instant::now(),
            ticks_since_log: 0,
        }
    }

    fn record_tick(&mut self) {
        self.tick_count += 1;
        self.ticks_since_log += 1;
    }

    fn maybe_log(&mut self, sim_time: f64, world: &hecs::World, ctx: &TickContext) {
        if sim_time - self.last_log_sim_time < STATS_LOG_INTERVAL {
            return;
        }
        let wall = self.last_log_wall.elapsed().as_secs_f64();
        let tps = if wall > 0.0 {
            self.ticks_since_log as f64 / wall
        } else {
            0.0
        };
        let census = Census::take(world);
        log::info!(
            "t={:.0}s | ticks/s: {:.0} | humans: {} alive, {} dead | blocked: {} | {}",
            sim_time,
            tps,
            census.humans_alive,
            census.humans_dead,
            census.blocked,
            census.state_summary(),
        );
        log::info!(
            "tick: {:.1}us ({})",
            ctx.timers.total_us(),
            ctx.timers.summary()
        );
        self.last_log_sim_time = sim_time;
        self.last_log_wall = Instant::now();
        self.ticks_since_log = 0;
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// Top-level simulation state.
struct App {
    world: hecs::World,
    ctx: TickContext,
    obstacles: ObstacleField,

    // RNG (shared, deterministic per seed)
    rng: fastrand::Rng,

    // Fixed timestep
    accumulator: f64,
    sim_time: f64,

    frame_stats: FrameStats,
}

impl App {
    fn new(config: &ArenaConfig, profile: &BehaviorProfile) -> Self {
        let mut rng = fastrand::Rng::with_seed(config.seed);
        let obstacles = ObstacleField::scatter(
            config.obstacles,
            systems::movement::ARENA_RADIUS,
            &mut rng,
        );
        let mut world = hecs::World::new();
        titan::spawn_titans(&mut world, config.titans, SPAWN_RADIUS, profile, &mut rng);
        titan::spawn_humans(&mut world, config.humans, SPAWN_RADIUS, &mut rng);
        log::info!(
            "Spawned {} titans, {} humans, {} obstacles (seed {})",
            config.titans,
            config.humans,
            obstacles.len(),
            config.seed
        );

        Self {
            world,
            ctx: TickContext::new(
                SPATIAL_CELL_SIZE,
                SPATIAL_TABLE_SIZE,
                config.titans + config.humans,
            ),
            obstacles,
            rng,
            accumulator: 0.0,
            sim_time: 0.0,
            frame_stats: FrameStats::new(),
        }
    }

    /// Run fixed-timestep simulation ticks.
    fn run_fixed_update(&mut self, dt: f64) {
        self.accumulator += dt;

        if self.accumulator > MAX_ACCUMULATOR {
            self.accumulator = MAX_ACCUMULATOR;
        }

        while self.accumulator >= TICK_RATE {
            systems::tick(
                &mut self.world,
                &mut self.ctx,
                &self.obstacles,
                &mut self.rng,
                TICK_RATE as f32,
            );

            self.accumulator -= TICK_RATE;
            self.sim_time += TICK_RATE;
            self.frame_stats.record_tick();
        }
        self.frame_stats
            .maybe_log(self.sim_time, &self.world, &self.ctx);
    }
}

/// Build the arena and run it for the configured duration.
pub fn run(config: &ArenaConfig) -> anyhow::Result<ArenaReport> {
    let profile = match &config.profile {
        Some(path) => BehaviorProfile::load(path)
            .with_context(|| format!("loading titan profile from {}", path.display()))?,
        None => BehaviorProfile::default_titan(),
    };
    profile.validate().context("titan profile")?;

    let mut app = App::new(config, &profile);
    let mut last_frame_time = Instant::now();
    while app.sim_time < config.duration {
        let dt = if config.realtime {
            std::thread::sleep(std::time::Duration::from_secs_f64(TICK_RATE));
            let now = Instant::now();
            let dt = now.duration_since(last_frame_time).as_secs_f64();
            last_frame_time = now;
            dt
        } else {
            FAST_FRAME
        };
        app.run_fixed_update(dt);
    }

    let census = Census::take(&app.world);
    log::info!(
        "Finished after {} ticks: {} humans alive, {} dead",
        app.frame_stats.tick_count,
        census.humans_alive,
        census.humans_dead
    );
    Ok(ArenaReport {
        ticks: app.frame_stats.tick_count,
        census,
    })
}
