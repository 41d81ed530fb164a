use glam::Vec3;

use crate::ai::body::SpatialProbe;

/// Boulder radius bounds for scattered obstacles.
const MIN_RADIUS: f32 = 15.0;
const MAX_RADIUS: f32 = 60.0;

/// A sphere resting on the ground plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub center: Vec3,
    pub radius: f32,
}

/// Static world geometry: a set of spheres.
#[derive(Debug, Clone, Default)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
}

impl ObstacleField {
    pub fn new(obstacles: Vec<Obstacle>) -> Self {
        Self { obstacles }
    }

    /// Scatter `count` boulders inside a disc of `arena_radius`, keeping the
    /// middle clear.
    pub fn scatter(count: usize, arena_radius: f32, rng: &mut fastrand::Rng) -> Self {
        let obstacles = (0..count)
            .map(|_| {
                let radius = MIN_RADIUS + rng.f32() * (MAX_RADIUS - MIN_RADIUS);
                let angle = rng.f32() * std::f32::consts::TAU;
                let dist = arena_radius * (0.15 + 0.85 * rng.f32().sqrt());
                Obstacle {
                    center: Vec3::new(angle.sin() * dist, radius, angle.cos() * dist),
                    radius,
                }
            })
            .collect();
        Self { obstacles }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Push a ground-plane circle out of every obstacle it overlaps.
    /// Height is left alone.
    pub fn push_out(&self, position: Vec3, radius: f32) -> Vec3 {
        let mut p = position;
        for o in &self.obstacles {
            let mut offset = p - o.center;
            offset.y = 0.0;
            let min_dist = radius + o.radius;
            let dist_sq = offset.length_squared();
            if dist_sq >= min_dist * min_dist {
                continue;
            }
            let dist = dist_sq.sqrt();
            let away = if dist > 1e-4 { offset / dist } else { Vec3::X };
            p += away * (min_dist - dist);
        }
        p
    }
}

/// Distance along `direction` at which a sphere of `radius` starting at
/// `origin` first touches `obstacle`. Obstacles already overlapping at the
/// start are not reported.
fn sweep(origin: Vec3, radius: f32, direction: Vec3, obstacle: &Obstacle) -> Option<f32> {
    let reach = radius + obstacle.radius;
    let m = origin - obstacle.center;
    let c = m.length_squared() - reach * reach;
    if c <= 0.0 {
        return None;
    }
    let b = m.dot(direction);
    if b > 0.0 {
        return None;
    }
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    Some(-b - disc.sqrt())
}

impl SpatialProbe for ObstacleField {
    fn sphere_cast(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<f32> {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO {
            return None;
        }
        self.obstacles
            .iter()
            .filter_map(|o| sweep(origin, radius, dir, o))
            .filter(|&t| t <= max_distance)
            .min_by(f32::total_cmp)
    }
}
