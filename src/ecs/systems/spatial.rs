use crate::ecs::components::{Health, Human, Position, Team};
use crate::spatial::{CharacterSnapshot, Characters, SpatialHash};

/// Rebuild the spatial hash grid and snapshot cache from current positions.
pub fn rebuild(world: &hecs::World, grid: &mut SpatialHash, characters: &mut Characters) {
    grid.clear();
    characters.clear();
    for (entity, (pos, team, health, human)) in world
        .query::<(&Position, &Team, &Health, Option<&Human>)>()
        .iter()
    {
        let idx = characters.push(CharacterSnapshot {
            entity,
            position: pos.0,
            team: *team,
            dead: health.is_dead(),
            human: human.is_some(),
        });
        grid.insert(pos.0, idx);
    }
}
