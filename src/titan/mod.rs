use glam::Vec3;

use crate::ai::{BehaviorProfile, Locomotion, TitanController, TitanVariant};
use crate::ecs::components::*;

/// Ground-plane collider radius of a stock titan.
const TITAN_COLLIDER_RADIUS: f32 = 6.0;
const TITAN_HEALTH: f32 = 1000.0;
const HUMAN_HEALTH: f32 = 30.0;

/// Spawn a batch of titans with randomized size and body plan.
pub fn spawn_titans(
    world: &mut hecs::World,
    count: usize,
    radius: f32,
    profile: &BehaviorProfile,
    rng: &mut fastrand::Rng,
) {
    for _ in 0..count {
        let variant = random_variant(rng);
        world.spawn((
            TitanName(generate_titan_name(rng)),
            Position(random_point(rng, radius)),
            Heading(rng.f32() * 360.0),
            TitanFrame {
                scale: 0.5 + rng.f32(), // 0.5x to 1.5x
                variant,
                collider_radius: TITAN_COLLIDER_RADIUS,
            },
            Health::new(TITAN_HEALTH),
            Team::Titans,
            ActionSlot::default(),
            Locomotion::default(),
            TargetEnemy::default(),
            DetectedEnemies::default(),
            TitanBrain(TitanController::new(profile.clone())),
        ));
    }
}

pub fn spawn_humans(world: &mut hecs::World, count: usize, radius: f32, rng: &mut fastrand::Rng) {
    for _ in 0..count {
        world.spawn((
            Position(random_point(rng, radius)),
            Health::new(HUMAN_HEALTH),
            Team::Humans,
            Human,
            Stroll {
                velocity: Vec3::ZERO,
                timer: rng.f32() * 3.0, // stagger first moves
            },
        ));
    }
}

/// Uniform point in a disc on the ground.
fn random_point(rng: &mut fastrand::Rng, radius: f32) -> Vec3 {
    let angle = rng.f32() * std::f32::consts::TAU;
    let dist = radius * rng.f32().sqrt();
    Vec3::new(angle.sin() * dist, 0.0, angle.cos() * dist)
}

fn random_variant(rng: &mut fastrand::Rng) -> TitanVariant {
    match rng.u8(0..10) {
        0..=6 => TitanVariant::Normal,
        7 | 8 => TitanVariant::Crawler,
        _ => TitanVariant::Shifter,
    }
}

/// Generate a procedural titan name from name parts.
fn generate_titan_name(rng: &mut fastrand::Rng) -> String {
    const PREFIXES: &[&str] = &["", "", "", "Old ", "Big ", "Grinning ", "Lanky ", "Hungry "];
    const NAMES: &[&str] = &[
        "Gorm", "Huld", "Brask", "Oddny", "Vigg", "Thrum", "Kjell", "Ymra", "Sken", "Darro",
        "Malk", "Rusk", "Tova", "Brann", "Eskil", "Hagga",
    ];
    const SUFFIXES: &[&str] = &["", "", "", " the Tall", " Longarm", " of the Wall"];
    format!(
        "{}{}{}",
        PREFIXES[rng.usize(0..PREFIXES.len())],
        NAMES[rng.usize(0..NAMES.len())],
        SUFFIXES[rng.usize(0..SUFFIXES.len())],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawns_requested_counts_inside_radius() {
        let mut world = hecs::World::new();
        let mut rng = fastrand::Rng::with_seed(1);
        spawn_titans(&mut world, 5, 200.0, &BehaviorProfile::default_titan(), &mut rng);
        spawn_humans(&mut world, 7, 200.0, &mut rng);

        assert_eq!(world.query::<&TitanBrain>().iter().count(), 5);
        assert_eq!(world.query::<&Human>().iter().count(), 7);
        for (_, pos) in world.query::<&Position>().iter() {
            assert!(pos.0.length() <= 200.0 + 1e-3);
        }
        for (_, frame) in world.query::<&TitanFrame>().iter() {
            assert!(frame.scale >= 0.5 && frame.scale <= 1.5);
        }
    }

    #[test]
    fn names_are_nonempty() {
        let mut rng = fastrand::Rng::with_seed(2);
        for _ in 0..20 {
            assert!(!generate_titan_name(&mut rng).trim().is_empty());
        }
    }
}
