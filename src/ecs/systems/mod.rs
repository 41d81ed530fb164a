pub mod actions;
pub mod behavior;
pub mod detection;
pub mod movement;
pub mod spatial;

use crate::debug::timer::{SystemPhase, SystemTimers};
use crate::obstacles::ObstacleField;
use crate::spatial::{Characters, SpatialHash};
use actions::ActionBuffers;

/// Long-lived scratch state the tick pipeline reuses between ticks.
pub struct TickContext {
    pub grid: SpatialHash,
    pub characters: Characters,
    pub action_bufs: ActionBuffers,
    pub timers: SystemTimers,
}

impl TickContext {
    pub fn new(cell_size: f32, table_size: usize, capacity: usize) -> Self {
        Self {
            grid: SpatialHash::new(cell_size, table_size),
            characters: Characters::with_capacity(capacity),
            action_bufs: ActionBuffers::new(),
            timers: SystemTimers::new(),
        }
    }
}

/// Run all simulation systems for one fixed tick.
pub fn tick(
    world: &mut hecs::World,
    ctx: &mut TickContext,
    obstacles: &ObstacleField,
    rng: &mut fastrand::Rng,
    dt: f32,
) {
    // 1. Rebuild spatial hash + character snapshot
    ctx.timers.begin();
    spatial::rebuild(world, &mut ctx.grid, &mut ctx.characters);
    ctx.timers.end(SystemPhase::Spatial);

    // 2. Detection sets
    ctx.timers.begin();
    detection::update(world, &ctx.grid, &ctx.characters);
    ctx.timers.end(SystemPhase::Detection);

    // 3. Titan controllers
    ctx.timers.begin();
    behavior::update(world, &ctx.characters, obstacles, rng, dt);
    ctx.timers.end(SystemPhase::Behavior);

    // 4. Locomotion for titans and humans
    ctx.timers.begin();
    movement::integrate(world, obstacles, dt);
    movement::stroll_humans(world, obstacles, rng, dt);
    ctx.timers.end(SystemPhase::Movement);

    // 5. Attack resolution and action timers
    ctx.timers.begin();
    actions::update(world, &ctx.characters, &mut ctx.action_bufs, dt);
    ctx.timers.end(SystemPhase::Actions);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{AiState, BehaviorProfile};
    use crate::ecs::components::{Health, Human, TitanBrain};
    use crate::titan;
    use glam::Vec3;

    #[test]
    fn arena_runs_and_titans_hunt() {
        let mut world = hecs::World::new();
        let mut rng = fastrand::Rng::with_seed(42);
        let obstacles = ObstacleField::scatter(10, 600.0, &mut rng);
        titan::spawn_titans(&mut world, 4, 300.0, &BehaviorProfile::default_titan(), &mut rng);
        titan::spawn_humans(&mut world, 20, 300.0, &mut rng);
        let mut ctx = TickContext::new(128.0, 1024, 64);

        let mut hunted = false;
        for _ in 0..(60 * 30) {
            tick(&mut world, &mut ctx, &obstacles, &mut rng, 1.0 / 60.0);
            for (_, brain) in world.query::<&TitanBrain>().iter() {
                if matches!(brain.0.state(), AiState::MoveToEnemy | AiState::Action) {
                    hunted = true;
                }
            }
        }
        assert!(hunted);

        let dead = world
            .query::<(&Health, &Human)>()
            .iter()
            .filter(|(_, (h, _))| h.is_dead())
            .count();
        assert!(dead > 0);
        for (_, pos) in world.query::<&crate::ecs::components::Position>().iter() {
            assert!(pos.0.is_finite());
            assert!(Vec3::new(pos.0.x, 0.0, pos.0.z).length() <= movement::ARENA_RADIUS + 1.0);
        }
    }
}
