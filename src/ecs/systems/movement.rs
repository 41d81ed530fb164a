use glam::Vec3;

use crate::ai::{geom, ActionState, Locomotion};
use crate::ecs::components::{ActionSlot, Heading, Health, Human, Position, Stroll, TitanFrame};
use crate::obstacles::ObstacleField;

/// Titan walk speed in units/second at scale 1.
const WALK_SPEED: f32 = 12.0;
/// Titan run speed in units/second at scale 1.
const RUN_SPEED: f32 = 30.0;
/// Max titan turn rate in degrees/second.
const TURN_RATE: f32 = 180.0;
/// Human stroll speed in units/second.
const HUMAN_SPEED: f32 = 8.0;
/// Human collision radius.
const HUMAN_RADIUS: f32 = 1.0;
/// Characters stay inside this disc.
pub const ARENA_RADIUS: f32 = 1500.0;

/// Turn titans toward their intended heading and move them forward.
/// Seated or busy titans hold still.
pub fn integrate(world: &mut hecs::World, obstacles: &ObstacleField, dt: f32) {
    for (_, (pos, heading, frame, loco, action, health)) in world.query_mut::<(
        &mut Position,
        &mut Heading,
        &TitanFrame,
        &Locomotion,
        &ActionSlot,
        &Health,
    )>() {
        if health.is_dead() || action.state != ActionState::Idle {
            continue;
        }
        if loco.sit || !loco.has_direction {
            continue;
        }

        heading.0 = turn_toward(heading.0, loco.target_heading, TURN_RATE * dt);

        let gait = if loco.walk { WALK_SPEED } else { RUN_SPEED };
        let speed = gait * frame.scale;
        let moved = pos.0 + geom::direction_of(heading.0) * speed * dt;
        pos.0 = clamp_to_arena(obstacles.push_out(moved, frame.radius()));
    }
}

/// Rotate `current` toward `target` by at most `max_step` degrees.
pub fn turn_toward(current: f32, target: f32, max_step: f32) -> f32 {
    let delta = geom::delta_degrees(current, target);
    geom::wrap_degrees(current + delta.clamp(-max_step, max_step))
}

/// Humans amble about, picking a new direction when their timer runs out.
pub fn stroll_humans(
    world: &mut hecs::World,
    obstacles: &ObstacleField,
    rng: &mut fastrand::Rng,
    dt: f32,
) {
    for (_, (pos, stroll, health, _)) in
        world.query_mut::<(&mut Position, &mut Stroll, &Health, &Human)>()
    {
        if health.is_dead() {
            continue;
        }
        stroll.timer -= dt;
        if stroll.timer <= 0.0 {
            stroll.timer = 2.0 + rng.f32() * 4.0;
            stroll.velocity = if rng.f32() < 0.3 {
                Vec3::ZERO
            } else {
                geom::direction_of(rng.f32() * 360.0) * HUMAN_SPEED
            };
        }
        let moved = pos.0 + stroll.velocity * dt;
        pos.0 = clamp_to_arena(obstacles.push_out(moved, HUMAN_RADIUS));
    }
}

fn clamp_to_arena(p: Vec3) -> Vec3 {
    let flat = Vec3::new(p.x, 0.0, p.z);
    let dist = flat.length();
    if dist <= ARENA_RADIUS {
        return p;
    }
    let inside = flat * (ARENA_RADIUS / dist);
    Vec3::new(inside.x, p.y, inside.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::TitanVariant;
    use approx::assert_abs_diff_eq;

    fn titan(world: &mut hecs::World, loco: Locomotion) -> hecs::Entity {
        world.spawn((
            Position(Vec3::ZERO),
            Heading(0.0),
            TitanFrame {
                scale: 2.0,
                variant: TitanVariant::Normal,
                collider_radius: 6.0,
            },
            loco,
            ActionSlot::default(),
            Health::new(100.0),
        ))
    }

    #[test]
    fn turn_rate_is_capped_and_takes_short_way() {
        assert_abs_diff_eq!(turn_toward(10.0, 50.0, 15.0), 25.0, epsilon = 1e-4);
        assert_abs_diff_eq!(turn_toward(10.0, 350.0, 15.0), 355.0, epsilon = 1e-4);
        assert_abs_diff_eq!(turn_toward(10.0, 12.0, 15.0), 12.0, epsilon = 1e-4);
    }

    #[test]
    fn running_titan_moves_forward_scaled() {
        let mut world = hecs::World::new();
        let e = titan(
            &mut world,
            Locomotion {
                target_heading: 0.0,
                has_direction: true,
                walk: false,
                sit: false,
            },
        );
        integrate(&mut world, &ObstacleField::default(), 0.5);
        let pos = world.get::<&Position>(e).unwrap().0;
        assert_abs_diff_eq!(pos.z, RUN_SPEED * 2.0 * 0.5, epsilon = 1e-3);
    }

    #[test]
    fn seated_or_busy_titans_stay_put() {
        let mut world = hecs::World::new();
        let seated = titan(
            &mut world,
            Locomotion {
                has_direction: true,
                sit: true,
                ..Locomotion::default()
            },
        );
        let busy = titan(
            &mut world,
            Locomotion {
                has_direction: true,
                ..Locomotion::default()
            },
        );
        world.get::<&mut ActionSlot>(busy).unwrap().state = ActionState::Attack;

        integrate(&mut world, &ObstacleField::default(), 1.0);
        assert_eq!(world.get::<&Position>(seated).unwrap().0, Vec3::ZERO);
        assert_eq!(world.get::<&Position>(busy).unwrap().0, Vec3::ZERO);
    }

    #[test]
    fn arena_edge_holds() {
        let p = clamp_to_arena(Vec3::new(ARENA_RADIUS * 2.0, 3.0, 0.0));
        assert_abs_diff_eq!(p.x, ARENA_RADIUS, epsilon = 1e-2);
        assert_eq!(p.y, 3.0);
    }
}
