use glam::Vec3;

use super::body::Roster;

/// Nearest live entity in `detected` by 3D distance. Ties keep the first seen.
pub fn find_nearest_enemy(
    origin: Vec3,
    detected: &[hecs::Entity],
    roster: &dyn Roster,
) -> Option<hecs::Entity> {
    let mut nearest_dist = f32::INFINITY;
    let mut nearest = None;
    for &entity in detected {
        let Some(info) = roster.lookup(entity) else {
            continue;
        };
        if info.dead {
            continue;
        }
        let dist = info.position.distance(origin);
        if dist < nearest_dist {
            nearest_dist = dist;
            nearest = Some(entity);
        }
    }
    nearest
}

/// Held target plus the focus timer that decides when to look again.
#[derive(Debug, Clone, Default)]
pub struct TargetLock {
    target: Option<hecs::Entity>,
    focus_left: f32,
}

impl TargetLock {
    pub fn target(&self) -> Option<hecs::Entity> {
        self.target
    }

    pub fn focus_left(&self) -> f32 {
        self.focus_left
    }

    pub fn age(&mut self, dt: f32) {
        self.focus_left -= dt;
    }

    pub fn pin(&mut self, entity: hecs::Entity, focus_time: f32) {
        self.target = Some(entity);
        self.focus_left = focus_time;
    }

    pub fn clear(&mut self) {
        self.target = None;
    }

    /// Drop the target if it died or vanished from the registry.
    pub fn validate(&mut self, roster: &dyn Roster) {
        if let Some(entity) = self.target {
            let alive = roster.lookup(entity).is_some_and(|info| !info.dead);
            if !alive {
                log::trace!("target {entity:?} gone");
                self.target = None;
            }
        }
    }

    /// Re-run acquisition when focus lapsed or nothing is held.
    ///
    /// If the scan comes back empty a held target survives until it is
    /// farther than `focus_range`.
    pub fn reacquire(
        &mut self,
        origin: Vec3,
        detected: &[hecs::Entity],
        roster: &dyn Roster,
        focus_range: f32,
        focus_time: f32,
    ) {
        if self.focus_left > 0.0 && self.target.is_some() {
            return;
        }
        match find_nearest_enemy(origin, detected, roster) {
            Some(enemy) => self.target = Some(enemy),
            None => {
                if let Some(held) = self.target {
                    let beyond = roster
                        .lookup(held)
                        .map_or(true, |info| info.position.distance(origin) > focus_range);
                    if beyond {
                        log::trace!("disengaging from {held:?}");
                        self.target = None;
                    }
                }
            }
        }
        self.focus_left = focus_time;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::body::CharacterInfo;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MapRoster(HashMap<hecs::Entity, CharacterInfo>);

    impl Roster for MapRoster {
        fn lookup(&self, entity: hecs::Entity) -> Option<CharacterInfo> {
            self.0.get(&entity).copied()
        }
    }

    fn human(x: f32, dead: bool) -> CharacterInfo {
        CharacterInfo {
            position: Vec3::new(x, 0.0, 0.0),
            dead,
            human: true,
        }
    }

    #[test]
    fn nearest_skips_dead_and_missing() {
        let mut world = hecs::World::new();
        let (a, b, c, ghost) = (world.spawn(()), world.spawn(()), world.spawn(()), world.spawn(()));
        let mut roster = MapRoster::default();
        roster.0.insert(a, human(5.0, true));
        roster.0.insert(b, human(20.0, false));
        roster.0.insert(c, human(10.0, false));

        let found = find_nearest_enemy(Vec3::ZERO, &[ghost, a, b, c], &roster);
        assert_eq!(found, Some(c));
    }

    #[test]
    fn nearest_tie_keeps_first() {
        let mut world = hecs::World::new();
        let (a, b) = (world.spawn(()), world.spawn(()));
        let mut roster = MapRoster::default();
        roster.0.insert(a, human(10.0, false));
        roster.0.insert(b, human(-10.0, false));

        assert_eq!(find_nearest_enemy(Vec3::ZERO, &[a, b], &roster), Some(a));
        assert_eq!(find_nearest_enemy(Vec3::ZERO, &[b, a], &roster), Some(b));
    }

    #[test]
    fn empty_scan_releases_only_beyond_focus_range() {
        let mut world = hecs::World::new();
        let a = world.spawn(());
        let mut roster = MapRoster::default();
        roster.0.insert(a, human(100.0, false));

        let mut lock = TargetLock::default();
        lock.pin(a, 0.0);
        lock.reacquire(Vec3::ZERO, &[], &roster, 150.0, 5.0);
        assert_eq!(lock.target(), Some(a));
        assert_eq!(lock.focus_left(), 5.0);

        roster.0.insert(a, human(200.0, false));
        lock.age(6.0);
        lock.reacquire(Vec3::ZERO, &[], &roster, 150.0, 5.0);
        assert_eq!(lock.target(), None);
    }

    #[test]
    fn focus_keeps_target_until_timer_lapses() {
        let mut world = hecs::World::new();
        let (far, near) = (world.spawn(()), world.spawn(()));
        let mut roster = MapRoster::default();
        roster.0.insert(far, human(50.0, false));
        roster.0.insert(near, human(5.0, false));

        let mut lock = TargetLock::default();
        lock.pin(far, 2.0);
        lock.reacquire(Vec3::ZERO, &[near, far], &roster, 150.0, 2.0);
        assert_eq!(lock.target(), Some(far));

        lock.age(2.0);
        lock.reacquire(Vec3::ZERO, &[near, far], &roster, 150.0, 2.0);
        assert_eq!(lock.target(), Some(near));
    }

    #[test]
    fn validate_drops_dead_target() {
        let mut world = hecs::World::new();
        let a = world.spawn(());
        let mut roster = MapRoster::default();
        roster.0.insert(a, human(1.0, true));

        let mut lock = TargetLock::default();
        lock.pin(a, 5.0);
        lock.validate(&roster);
        assert_eq!(lock.target(), None);
    }
}
