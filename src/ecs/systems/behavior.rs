use glam::Vec3;

use crate::ai::{geom, ActionState, AiState, Footprint, Locomotion, Senses, TitanBody, TitanVariant};
use crate::ecs::components::{
    ActionSlot, DetectedEnemies, Heading, Health, Position, TargetEnemy, TitanBrain, TitanFrame,
    TitanName,
};
use crate::obstacles::ObstacleField;
use crate::spatial::Characters;

/// Seconds a dispatched attack keeps the titan busy.
pub const ATTACK_DURATION: f32 = 1.2;

/// One titan's components, borrowed as a body for the controller.
struct TitanView<'a> {
    position: Vec3,
    heading: &'a mut Heading,
    frame: &'a TitanFrame,
    health: &'a Health,
    action: &'a mut ActionSlot,
    loco: &'a mut Locomotion,
    target: &'a mut TargetEnemy,
}

impl TitanBody for TitanView<'_> {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn heading(&self) -> f32 {
        self.heading.0
    }

    fn size(&self) -> f32 {
        self.frame.scale
    }

    fn is_dead(&self) -> bool {
        self.health.is_dead()
    }

    fn action(&self) -> ActionState {
        self.action.state
    }

    fn variant(&self) -> TitanVariant {
        self.frame.variant
    }

    fn footprint(&self) -> Footprint {
        let radius = self.frame.radius();
        Footprint {
            center: self.position + Vec3::Y * radius,
            radius,
        }
    }

    fn can_attack(&self) -> bool {
        self.action.state == ActionState::Idle
    }

    fn locomotion_mut(&mut self) -> &mut Locomotion {
        self.loco
    }

    fn turn(&mut self, direction: Vec3) {
        // Turns in place are instant here.
        self.heading.0 = geom::heading_of(direction);
    }

    fn attack(&mut self, name: &str) {
        self.action.state = ActionState::Attack;
        self.action.remaining = ATTACK_DURATION;
        self.action.attack = Some(name.to_string());
        self.action.hit_pending = true;
    }

    fn set_target_enemy(&mut self, enemy: Option<hecs::Entity>) {
        self.target.0 = enemy;
    }
}

/// Tick every titan's controller against the current snapshot.
pub fn update(
    world: &mut hecs::World,
    characters: &Characters,
    obstacles: &ObstacleField,
    rng: &mut fastrand::Rng,
    dt: f32,
) {
    for (_, (name, pos, heading, frame, health, action, loco, target, detected, brain)) in world
        .query_mut::<(
            &TitanName,
            &Position,
            &mut Heading,
            &TitanFrame,
            &Health,
            &mut ActionSlot,
            &mut Locomotion,
            &mut TargetEnemy,
            &DetectedEnemies,
            &mut TitanBrain,
        )>()
    {
        let senses = Senses {
            roster: characters,
            detected: &detected.0,
            probe: obstacles,
        };
        let mut body = TitanView {
            position: pos.0,
            heading,
            frame,
            health,
            action,
            loco,
            target,
        };
        let before = brain.0.state();
        brain.0.tick(&mut body, &senses, rng, dt);
        let after = brain.0.state();
        if before == after {
            continue;
        }
        log::debug!(
            "{} ({}): {} -> {}",
            name.0,
            frame.variant.label(),
            before,
            after
        );
        if after == AiState::Action {
            if let Some(attack) = brain.0.last_attack() {
                log::debug!("{} attacks with {attack}", name.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{BehaviorProfile, TitanController};
    use crate::ecs::components::{Human, Team};
    use crate::ecs::systems::{detection, spatial};
    use crate::spatial::SpatialHash;

    fn spawn_titan(world: &mut hecs::World, at: Vec3) -> hecs::Entity {
        world.spawn((
            TitanName("Test".into()),
            Position(at),
            Heading(0.0),
            TitanFrame {
                scale: 1.0,
                variant: TitanVariant::Normal,
                collider_radius: 6.0,
            },
            Health::new(1000.0),
            Team::Titans,
            ActionSlot::default(),
            Locomotion::default(),
            TargetEnemy::default(),
            DetectedEnemies::default(),
            TitanBrain(TitanController::new(BehaviorProfile::default_titan())),
        ))
    }

    #[test]
    fn titan_goes_for_nearby_human() {
        let mut world = hecs::World::new();
        let titan = spawn_titan(&mut world, Vec3::ZERO);
        let human = world.spawn((
            Position(Vec3::new(0.0, 0.0, 15.0)),
            Team::Humans,
            Health::new(10.0),
            Human,
        ));
        let mut grid = SpatialHash::new(128.0, 512);
        let mut characters = Characters::default();
        let obstacles = ObstacleField::default();
        let mut rng = fastrand::Rng::with_seed(3);

        for _ in 0..2 {
            spatial::rebuild(&world, &mut grid, &mut characters);
            detection::update(&mut world, &grid, &characters);
            update(&mut world, &characters, &obstacles, &mut rng, 1.0 / 60.0);
        }

        let brain = world.get::<&TitanBrain>(titan).unwrap();
        assert_eq!(brain.0.target(), Some(human));
        assert_eq!(brain.0.state(), AiState::Action);
        assert_eq!(world.get::<&TargetEnemy>(titan).unwrap().0, Some(human));
        let slot = world.get::<&ActionSlot>(titan).unwrap();
        assert_eq!(slot.state, ActionState::Attack);
        assert!(slot.hit_pending);
    }
}
