use glam::{Quat, Vec3};

use super::body::{SpatialProbe, TitanBody};
use super::geom::{self, range_f32};

/// Probes in the avoidance fan.
pub const SAMPLE_RAY_COUNT: usize = 6;
/// Total fan width in degrees, centred on forward.
pub const SAMPLE_FAN_DEGREES: f32 = 120.0;
/// Weight of the goal direction in the blended heading.
pub const TARGET_WEIGHT: f32 = 1.0;
/// Weight of the free direction once avoidance kicks in.
pub const COLLISION_WEIGHT: f32 = 140.0;
/// Fan probe length; a clear probe reports exactly this.
pub const COLLISION_AVOID_DISTANCE: f32 = 100.0;
/// Forward lookahead for "are we about to hit something".
pub const COLLISION_DETECTION_DISTANCE: f32 = 100.0;
/// Jitter re-rolled whenever avoidance triggers.
const BLOCKED_JITTER: f32 = 10.0;

/// One fan probe result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeSample {
    pub direction: Vec3,
    /// Hit distance, or the clear distance when nothing was hit.
    pub distance: f32,
}

/// Heading computation with obstacle avoidance.
#[derive(Debug, Clone, Default)]
pub struct Steering {
    /// Per-state angular jitter in degrees.
    pub move_angle: f32,
    /// Set when the last heading computation had to avoid something.
    pub was_blocked: bool,
}

impl Steering {
    /// Heading for a direction with the current jitter applied.
    pub fn chase_heading_for(&self, direction: Vec3) -> f32 {
        geom::wrap_degrees(geom::heading_of(direction) + self.move_angle)
    }

    /// Heading from `from` toward `goal` with jitter, no avoidance.
    pub fn chase_heading(&self, from: Vec3, goal: Vec3) -> f32 {
        self.chase_heading_for((goal - from).normalize_or_zero())
    }

    /// Blend the goal direction with a free direction when `avoid` is set and
    /// the way ahead is blocked. Resets `was_blocked` on every call.
    pub fn heading_toward<B: TitanBody + ?Sized>(
        &mut self,
        body: &B,
        probe: &dyn SpatialProbe,
        goal: Vec3,
        avoid: bool,
        rng: &mut fastrand::Rng,
    ) -> f32 {
        let goal_direction = goal - body.position();
        let mut result = goal_direction.normalize_or_zero() * TARGET_WEIGHT;
        self.was_blocked = false;
        if avoid && heading_for_collision(body, probe) {
            self.was_blocked = true;
            self.move_angle = range_f32(rng, -BLOCKED_JITTER, BLOCKED_JITTER);
            let free = free_direction(body, probe, goal_direction);
            log::trace!("path blocked, steering toward {free:?}");
            result += free.normalize_or_zero() * COLLISION_WEIGHT;
        }
        self.chase_heading_for(result.normalize_or_zero())
    }
}

/// Sphere-cast the body's footprint straight ahead.
pub fn heading_for_collision<B: TitanBody + ?Sized>(body: &B, probe: &dyn SpatialProbe) -> bool {
    let fp = body.footprint();
    let forward = body.forward();
    let start = fp.center - forward * fp.radius;
    probe
        .sphere_cast(start, fp.radius, forward, COLLISION_DETECTION_DISTANCE)
        .is_some()
}

/// Directions of the avoidance fan, evenly spread and symmetric about `forward`.
pub fn fan_directions(forward: Vec3) -> [Vec3; SAMPLE_RAY_COUNT] {
    let step = SAMPLE_FAN_DEGREES / (SAMPLE_RAY_COUNT - 1) as f32;
    std::array::from_fn(|i| {
        let angle = i as f32 * step - SAMPLE_FAN_DEGREES / 2.0;
        Quat::from_rotation_y(angle.to_radians()) * forward
    })
}

/// Cast the fan and return the chosen endpoint-minus-centre vector.
pub fn free_direction<B: TitanBody + ?Sized>(
    body: &B,
    probe: &dyn SpatialProbe,
    goal_direction: Vec3,
) -> Vec3 {
    let fp = body.footprint();
    let forward = body.forward();
    let start = fp.center - forward * fp.radius;
    let samples = fan_directions(forward).map(|direction| ProbeSample {
        direction,
        distance: probe
            .sphere_cast(start, fp.radius, direction, COLLISION_AVOID_DISTANCE)
            .unwrap_or(COLLISION_AVOID_DISTANCE),
    });
    pick_free_direction(&samples, start, fp.center, forward, goal_direction)
}

/// Longest probe wins; an exact tie goes to the endpoint better aligned with
/// the goal. Starts from `fallback` with zero score and zero alignment.
pub fn pick_free_direction(
    samples: &[ProbeSample],
    start: Vec3,
    center: Vec3,
    fallback: Vec3,
    goal_direction: Vec3,
) -> Vec3 {
    let goal = goal_direction.normalize_or_zero();
    let mut best = fallback;
    let mut best_score = 0.0;
    let mut best_alignment = 0.0;
    for sample in samples {
        let endpoint = start + sample.direction.normalize_or_zero() * sample.distance - center;
        let alignment = endpoint.dot(goal);
        let better = sample.distance > best_score
            || (sample.distance == best_score && alignment > best_alignment);
        if better {
            best = endpoint;
            best_score = sample.distance;
            best_alignment = alignment;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::body::{ActionState, Footprint, Locomotion, TitanVariant};
    use approx::assert_abs_diff_eq;

    struct Dummy {
        position: Vec3,
        heading: f32,
        loco: Locomotion,
    }

    impl TitanBody for Dummy {
        fn position(&self) -> Vec3 {
            self.position
        }
        fn heading(&self) -> f32 {
            self.heading
        }
        fn size(&self) -> f32 {
            1.0
        }
        fn is_dead(&self) -> bool {
            false
        }
        fn action(&self) -> ActionState {
            ActionState::Idle
        }
        fn variant(&self) -> TitanVariant {
            TitanVariant::Normal
        }
        fn footprint(&self) -> Footprint {
            Footprint {
                center: self.position + Vec3::Y * 5.0,
                radius: 4.0,
            }
        }
        fn can_attack(&self) -> bool {
            true
        }
        fn locomotion_mut(&mut self) -> &mut Locomotion {
            &mut self.loco
        }
        fn turn(&mut self, _direction: Vec3) {}
        fn attack(&mut self, _name: &str) {}
        fn set_target_enemy(&mut self, _enemy: Option<hecs::Entity>) {}
    }

    fn dummy() -> Dummy {
        Dummy {
            position: Vec3::ZERO,
            heading: 0.0,
            loco: Locomotion::default(),
        }
    }

    struct OpenField;

    impl SpatialProbe for OpenField {
        fn sphere_cast(&self, _: Vec3, _: f32, _: Vec3, _: f32) -> Option<f32> {
            None
        }
    }

    /// Wall straight ahead; probes pointing more than `open_beyond` degrees
    /// off +Z (toward +X only) are clear.
    struct WallAhead {
        open_beyond: f32,
    }

    impl SpatialProbe for WallAhead {
        fn sphere_cast(&self, _: Vec3, _: f32, direction: Vec3, _: f32) -> Option<f32> {
            let off = geom::heading_of(direction);
            if off > self.open_beyond && off < 180.0 {
                None
            } else {
                Some(15.0)
            }
        }
    }

    #[test]
    fn fan_is_symmetric_about_forward() {
        let dirs = fan_directions(Vec3::Z);
        let mut offsets: Vec<f32> = dirs.iter().map(|d| geom::delta_degrees(0.0, geom::heading_of(*d))).collect();
        offsets.sort_by(f32::total_cmp);
        assert_abs_diff_eq!(offsets[0], -60.0, epsilon = 1e-3);
        assert_abs_diff_eq!(offsets[5], 60.0, epsilon = 1e-3);
        for i in 0..3 {
            assert_abs_diff_eq!(offsets[i], -offsets[5 - i], epsilon = 1e-3);
        }
    }

    #[test]
    fn clear_path_heads_straight_at_goal() {
        let body = dummy();
        let mut steering = Steering::default();
        let mut rng = fastrand::Rng::with_seed(9);
        let heading = steering.heading_toward(&body, &OpenField, Vec3::new(100.0, 0.0, 0.0), true, &mut rng);
        assert_abs_diff_eq!(heading, 90.0, epsilon = 1e-3);
        assert!(!steering.was_blocked);
    }

    #[test]
    fn jitter_offsets_and_wraps_heading() {
        let body = dummy();
        let mut steering = Steering {
            move_angle: -30.0,
            ..Steering::default()
        };
        let mut rng = fastrand::Rng::with_seed(9);
        let heading = steering.heading_toward(&body, &OpenField, Vec3::new(0.0, 0.0, 50.0), false, &mut rng);
        assert_abs_diff_eq!(heading, 330.0, epsilon = 1e-3);
    }

    #[test]
    fn blocked_path_swings_toward_open_side() {
        let body = dummy();
        let mut steering = Steering::default();
        let mut rng = fastrand::Rng::with_seed(4);
        let heading = steering.heading_toward(
            &body,
            &WallAhead { open_beyond: 30.0 },
            Vec3::new(0.0, 0.0, 200.0),
            true,
            &mut rng,
        );
        assert!(steering.was_blocked);
        assert!(steering.move_angle.abs() <= 10.0);
        // Pulled well over to the +X side, minus at most the jitter.
        assert!(heading > 25.0 && heading < 70.0, "heading {heading}");
    }

    #[test]
    fn avoidance_skipped_when_not_requested() {
        let body = dummy();
        let mut steering = Steering::default();
        let mut rng = fastrand::Rng::with_seed(4);
        let heading = steering.heading_toward(
            &body,
            &WallAhead { open_beyond: 30.0 },
            Vec3::new(0.0, 0.0, 200.0),
            false,
            &mut rng,
        );
        assert!(!steering.was_blocked);
        assert_abs_diff_eq!(heading, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn longest_probe_wins() {
        let samples = [
            ProbeSample { direction: Vec3::X, distance: 40.0 },
            ProbeSample { direction: -Vec3::X, distance: 90.0 },
        ];
        let picked = pick_free_direction(&samples, Vec3::ZERO, Vec3::ZERO, Vec3::Z, Vec3::X);
        assert_abs_diff_eq!(picked.x, -90.0, epsilon = 1e-4);
    }

    #[test]
    fn equal_clearance_prefers_goal_alignment() {
        // Probes at +-30 degrees off forward, goal leaning 10 degrees right.
        let left = Quat::from_rotation_y((-30f32).to_radians()) * Vec3::Z;
        let right = Quat::from_rotation_y(30f32.to_radians()) * Vec3::Z;
        let goal = geom::direction_of(10.0);
        let samples = [
            ProbeSample { direction: left, distance: 100.0 },
            ProbeSample { direction: right, distance: 100.0 },
        ];
        let start = Vec3::new(0.0, 5.0, -4.0);
        let center = Vec3::new(0.0, 5.0, 0.0);
        let picked = pick_free_direction(&samples, start, center, Vec3::Z, goal);
        let expected = start + right * 100.0 - center;
        assert_abs_diff_eq!(picked.x, expected.x, epsilon = 1e-4);
        assert_abs_diff_eq!(picked.z, expected.z, epsilon = 1e-4);

        // Order of the probes does not matter.
        let swapped = [samples[1], samples[0]];
        let picked = pick_free_direction(&swapped, start, center, Vec3::Z, goal);
        assert_abs_diff_eq!(picked.x, expected.x, epsilon = 1e-4);
    }
}
