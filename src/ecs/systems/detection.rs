use crate::ecs::components::{DetectedEnemies, Position, Team, TitanBrain};
use crate::spatial::{Characters, SpatialHash};

/// Refill each titan's detection set: living characters of another team
/// within its detection radius (3D).
pub fn update(world: &mut hecs::World, grid: &SpatialHash, characters: &Characters) {
    for (_, (pos, team, brain, detected)) in
        world.query_mut::<(&Position, &Team, &TitanBrain, &mut DetectedEnemies)>()
    {
        detected.0.clear();
        let radius = brain.0.detection_radius();
        let radius_sq = radius * radius;
        grid.query_radius(pos.0, radius, |idx| {
            let Some(snap) = characters.snapshots.get(idx as usize) else {
                return;
            };
            if snap.team == *team || snap.dead {
                return;
            }
            if snap.position.distance_squared(pos.0) > radius_sq {
                return;
            }
            detected.0.push(snap.entity);
        });
        // Buckets can repeat an index.
        detected.0.sort_unstable();
        detected.0.dedup();
    }
}
