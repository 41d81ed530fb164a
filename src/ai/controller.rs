//! The titan behaviour state machine.
//!
//! One [`TitanController`] per creature. Each tick it ages its timers, keeps
//! the target lock honest, then runs the rule for the active [`AiState`].
//! Steering, target acquisition and attack selection are invoked from the
//! state rules; all movement and attack output goes through [`TitanBody`].

use glam::Vec3;

use super::attack;
use super::body::{ActionState, CharacterInfo, Senses, TitanBody, TitanVariant};
use super::geom::{self, range_f32};
use super::profile::{AttackDef, BehaviorProfile};
use super::state::AiState;
use super::steering::Steering;
use super::targeting::{self, TargetLock};

/// Idle dwell time bounds (seconds).
const IDLE_TIME: (f32, f32) = (2.0, 6.0);
/// Wander leg duration bounds.
const WANDER_TIME: (f32, f32) = (2.0, 8.0);
/// Sit duration bounds.
const SIT_TIME: (f32, f32) = (6.0, 12.0);
/// Chance an expiring Idle sits down instead of wandering.
const SIT_CHANCE: f32 = 0.3;
/// Wander headings further than this from forward snap with a turn.
const WANDER_SNAP_ANGLE: f32 = 60.0;
/// Chase heading jitter bounds (degrees).
const CHASE_JITTER: f32 = 45.0;
/// Seconds of waiting after which WaitAttack starts walking in.
const WAIT_RESUME_TIME: f32 = 2.0;

/// Externally issued destination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveOrder {
    pub destination: Vec3,
    pub arrival_radius: f32,
    /// Suppress targeting while the order stands.
    pub ignore_enemies: bool,
}

/// Body-side work queued by commands, applied at the next tick boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Pending {
    #[default]
    Nothing,
    ClearIntent,
    EnterIdle,
}

pub struct TitanController {
    profile: BehaviorProfile,
    state: AiState,
    state_time_left: f32,
    lock: TargetLock,
    order: Option<MoveOrder>,
    steering: Steering,
    /// Close attack range rolled for the current engagement.
    attack_range: f32,
    attack_cooldown_left: f32,
    wait_attack_time: f32,
    last_attack: Option<String>,
    pending: Pending,
}

impl TitanController {
    /// Fresh controller. The first tick enters Idle.
    pub fn new(profile: BehaviorProfile) -> Self {
        Self {
            profile,
            state: AiState::Idle,
            state_time_left: 0.0,
            lock: TargetLock::default(),
            order: None,
            steering: Steering::default(),
            attack_range: 0.0,
            attack_cooldown_left: 0.0,
            wait_attack_time: 0.0,
            last_attack: None,
            pending: Pending::EnterIdle,
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn state(&self) -> AiState {
        self.state
    }

    pub fn state_time_left(&self) -> f32 {
        self.state_time_left
    }

    pub fn target(&self) -> Option<hecs::Entity> {
        self.lock.target()
    }

    pub fn order(&self) -> Option<MoveOrder> {
        self.order
    }

    pub fn profile(&self) -> &BehaviorProfile {
        &self.profile
    }

    pub fn detection_radius(&self) -> f32 {
        self.profile.detect_range
    }

    pub fn was_blocked(&self) -> bool {
        self.steering.was_blocked
    }

    pub fn move_angle(&self) -> f32 {
        self.steering.move_angle
    }

    pub fn attack_range(&self) -> f32 {
        self.attack_range
    }

    pub fn attack_cooldown_left(&self) -> f32 {
        self.attack_cooldown_left
    }

    /// Name of the most recently dispatched attack.
    pub fn last_attack(&self) -> Option<&str> {
        self.last_attack.as_deref()
    }

    pub fn set_attack_cooldown(&mut self, seconds: f32) {
        self.attack_cooldown_left = seconds;
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    pub fn move_to(&mut self, destination: Vec3, arrival_radius: f32, ignore_enemies: bool) {
        self.order = Some(MoveOrder {
            destination,
            arrival_radius,
            ignore_enemies,
        });
    }

    /// Drop any order and target. Releases a forced idle.
    pub fn cancel_order(&mut self) {
        self.order = None;
        if self.state == AiState::ForcedIdle {
            self.state = AiState::Idle;
            self.state_time_left = 0.0;
            self.pending = Pending::EnterIdle;
        }
        self.lock.clear();
    }

    /// Freeze in place for `duration` seconds of ticks.
    pub fn force_idle(&mut self, duration: f32) {
        self.state = AiState::ForcedIdle;
        self.state_time_left = duration;
        self.pending = Pending::ClearIntent;
    }

    /// Pin a target. A zero `focus_time` uses the profile's focus time.
    pub fn set_enemy(&mut self, enemy: hecs::Entity, focus_time: f32) {
        let focus = if focus_time == 0.0 {
            self.profile.focus_time
        } else {
            focus_time
        };
        self.lock.pin(enemy, focus);
    }

    /// Negative and non-finite radii are ignored.
    pub fn set_detection_radius(&mut self, radius: f32) {
        if !(radius.is_finite() && radius >= 0.0) {
            log::warn!("ignoring detection radius {radius}");
            return;
        }
        self.profile.detect_range = radius;
    }

    /// Name of an attack to use on `target` from the current pose.
    pub fn select_attack<B: TitanBody + ?Sized>(
        &self,
        body: &B,
        target: &CharacterInfo,
        far_only: bool,
        rng: &mut fastrand::Rng,
    ) -> Option<&str> {
        let local = geom::to_local(body.position(), body.heading(), body.size(), target.position);
        attack::select(&self.profile.attacks, local, target.human, far_only, rng)
            .map(|a: &AttackDef| a.name.as_str())
    }

    /// Nearest live entity in the current detection set.
    pub fn find_nearest_enemy<B: TitanBody + ?Sized>(
        &self,
        body: &B,
        senses: &Senses<'_>,
    ) -> Option<hecs::Entity> {
        targeting::find_nearest_enemy(body.position(), senses.detected, senses.roster)
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    /// Advance one simulation step.
    pub fn tick<B: TitanBody + ?Sized>(
        &mut self,
        body: &mut B,
        senses: &Senses<'_>,
        rng: &mut fastrand::Rng,
        dt: f32,
    ) {
        self.apply_pending(body, rng);

        self.lock.age(dt);
        self.state_time_left -= dt;
        self.lock.validate(senses.roster);
        if body.is_dead() {
            return;
        }
        if !matches!(body.action(), ActionState::Attack | ActionState::Eat) {
            self.attack_cooldown_left -= dt;
        }
        if self.state == AiState::ForcedIdle {
            if self.state_time_left > 0.0 {
                return;
            }
            self.idle(body, rng);
        }

        self.lock.reacquire(
            body.position(),
            senses.detected,
            senses.roster,
            self.profile.focus_range,
            self.profile.focus_time,
        );
        body.set_target_enemy(self.lock.target());
        if self.order.is_some_and(|o| o.ignore_enemies) {
            self.lock.clear();
        }

        let enemy = self.lock.target().and_then(|e| senses.roster.lookup(e));
        match self.state {
            AiState::Idle | AiState::Wander | AiState::SitIdle => {
                self.update_passive(body, senses, enemy, rng)
            }
            AiState::MoveToPosition => self.update_move_to_position(body, senses, rng),
            AiState::MoveToEnemy => self.update_move_to_enemy(body, senses, enemy, rng),
            AiState::WaitAttack => self.update_wait_attack(body, senses, enemy, rng, dt),
            AiState::Action => {
                if body.action() == ActionState::Idle {
                    self.idle(body, rng);
                }
            }
            AiState::ForcedIdle => {}
        }
    }

    fn apply_pending<B: TitanBody + ?Sized>(&mut self, body: &mut B, rng: &mut fastrand::Rng) {
        match std::mem::take(&mut self.pending) {
            Pending::Nothing => {}
            Pending::ClearIntent => {
                let loco = body.locomotion_mut();
                loco.has_direction = false;
                loco.sit = false;
            }
            Pending::EnterIdle => self.idle(body, rng),
        }
    }

    // -----------------------------------------------------------------------
    // Per-state rules
    // -----------------------------------------------------------------------

    fn update_passive<B: TitanBody + ?Sized>(
        &mut self,
        body: &mut B,
        senses: &Senses<'_>,
        enemy: Option<CharacterInfo>,
        rng: &mut fastrand::Rng,
    ) {
        if let Some(target) = enemy {
            let size = body.size();
            self.attack_range = range_f32(
                rng,
                self.profile.close_attack_range_min * size,
                self.profile.close_attack_range_max * size,
            );
            self.move_to_enemy(body, senses, target.position, true, rng);
            return;
        }
        if let Some(order) = self.order {
            self.move_to_position(body, senses, order.destination, true, rng);
            return;
        }
        if self.state_time_left > 0.0 {
            return;
        }
        if self.state == AiState::Idle {
            if body.variant().can_sit() && rng.f32() < SIT_CHANCE {
                self.sit(body, rng);
            } else {
                self.wander(body, rng);
            }
        } else {
            self.idle(body, rng);
        }
    }

    fn update_move_to_position<B: TitanBody + ?Sized>(
        &mut self,
        body: &mut B,
        senses: &Senses<'_>,
        rng: &mut fastrand::Rng,
    ) {
        let position = body.position();
        let active = self
            .order
            .filter(|o| position.distance(o.destination) >= o.arrival_radius);
        let Some(order) = active else {
            self.order = None;
            self.idle(body, rng);
            return;
        };
        if self.state_time_left <= 0.0 {
            self.move_to_position(body, senses, order.destination, true, rng);
        } else if !self.steering.was_blocked {
            body.locomotion_mut().target_heading =
                self.steering.chase_heading(position, order.destination);
        }
    }

    fn update_move_to_enemy<B: TitanBody + ?Sized>(
        &mut self,
        body: &mut B,
        senses: &Senses<'_>,
        enemy: Option<CharacterInfo>,
        rng: &mut fastrand::Rng,
    ) {
        let Some(target) = enemy else {
            self.idle(body, rng);
            return;
        };
        let planar = geom::planar_distance(body.position(), target.position);
        if self.state_time_left <= 0.0 && planar > self.profile.chase_angle_min_range {
            self.move_to_enemy(body, senses, target.position, true, rng);
            return;
        }

        if planar <= self.attack_range {
            if self.profile.attack_wait_max > 0.0 {
                self.wait_attack(body, rng);
            } else if !self.try_attack(body, &target, false, rng) {
                if self.enemy_angle(body, target.position) > self.profile.turn_angle {
                    self.turn_toward(body, target.position);
                } else {
                    self.move_to_enemy(body, senses, target.position, false, rng);
                }
            }
            return;
        }

        // Far range is planar, like the close check.
        let thrown = planar <= self.profile.far_attack_range && self.try_attack(body, &target, true, rng);
        if !thrown && !self.steering.was_blocked {
            body.locomotion_mut().target_heading =
                self.steering.chase_heading(body.position(), target.position);
        }
    }

    fn update_wait_attack<B: TitanBody + ?Sized>(
        &mut self,
        body: &mut B,
        senses: &Senses<'_>,
        enemy: Option<CharacterInfo>,
        rng: &mut fastrand::Rng,
        dt: f32,
    ) {
        let Some(target) = enemy else {
            self.idle(body, rng);
            return;
        };
        if self.state_time_left > 0.0 {
            return;
        }

        self.wait_attack_time += dt;
        body.locomotion_mut().has_direction = false;
        let planar = geom::planar_distance(body.position(), target.position);
        if planar > self.attack_range {
            self.move_to_enemy(body, senses, target.position, false, rng);
            return;
        }
        if self.try_attack(body, &target, false, rng) {
            return;
        }
        if self.enemy_angle(body, target.position) > self.profile.turn_angle {
            self.turn_toward(body, target.position);
        } else if self.wait_attack_time > WAIT_RESUME_TIME {
            self.steering.move_angle = 0.0;
            let heading = self.steering.chase_heading(body.position(), target.position);
            let loco = body.locomotion_mut();
            loco.has_direction = true;
            loco.walk = !self.profile.is_run;
            loco.target_heading = heading;
        }
    }

    // -----------------------------------------------------------------------
    // State entry
    // -----------------------------------------------------------------------

    fn idle<B: TitanBody + ?Sized>(&mut self, body: &mut B, rng: &mut fastrand::Rng) {
        self.state = AiState::Idle;
        let loco = body.locomotion_mut();
        loco.has_direction = false;
        loco.sit = false;
        self.state_time_left = range_f32(rng, IDLE_TIME.0, IDLE_TIME.1);
    }

    fn wander<B: TitanBody + ?Sized>(&mut self, body: &mut B, rng: &mut fastrand::Rng) {
        self.state = AiState::Wander;
        let heading = rng.f32() * 360.0;
        // Crawlers have no walking gait.
        let walk = body.variant() != TitanVariant::Crawler;
        let loco = body.locomotion_mut();
        loco.has_direction = true;
        loco.target_heading = heading;
        loco.walk = walk;
        loco.sit = false;
        let direction = geom::direction_of(heading);
        if geom::angle_between(body.forward(), direction) > WANDER_SNAP_ANGLE {
            body.turn(direction);
        }
        self.state_time_left = range_f32(rng, WANDER_TIME.0, WANDER_TIME.1);
    }

    fn sit<B: TitanBody + ?Sized>(&mut self, body: &mut B, rng: &mut fastrand::Rng) {
        self.state = AiState::SitIdle;
        body.locomotion_mut().sit = true;
        self.state_time_left = range_f32(rng, SIT_TIME.0, SIT_TIME.1);
    }

    fn move_to_enemy<B: TitanBody + ?Sized>(
        &mut self,
        body: &mut B,
        senses: &Senses<'_>,
        enemy_position: Vec3,
        avoid: bool,
        rng: &mut fastrand::Rng,
    ) {
        self.state = AiState::MoveToEnemy;
        self.start_moving(body);
        let dodge = geom::planar_distance(body.position(), enemy_position)
            > self.profile.chase_angle_min_range;
        self.steering.move_angle = if dodge {
            range_f32(rng, -CHASE_JITTER, CHASE_JITTER)
        } else {
            0.0
        };
        let heading = self
            .steering
            .heading_toward(&*body, senses.probe, enemy_position, avoid, rng);
        body.locomotion_mut().target_heading = heading;
        self.state_time_left = range_f32(
            rng,
            self.profile.chase_angle_time_min,
            self.profile.chase_angle_time_max,
        );
    }

    fn move_to_position<B: TitanBody + ?Sized>(
        &mut self,
        body: &mut B,
        senses: &Senses<'_>,
        destination: Vec3,
        avoid: bool,
        rng: &mut fastrand::Rng,
    ) {
        self.state = AiState::MoveToPosition;
        self.start_moving(body);
        self.steering.move_angle = range_f32(rng, -CHASE_JITTER, CHASE_JITTER);
        let heading = self
            .steering
            .heading_toward(&*body, senses.probe, destination, avoid, rng);
        body.locomotion_mut().target_heading = heading;
        self.state_time_left = range_f32(
            rng,
            self.profile.chase_angle_time_min,
            self.profile.chase_angle_time_max,
        );
    }

    fn start_moving<B: TitanBody + ?Sized>(&self, body: &mut B) {
        let loco = body.locomotion_mut();
        loco.has_direction = true;
        loco.sit = false;
        loco.walk = !self.profile.is_run;
    }

    fn wait_attack<B: TitanBody + ?Sized>(&mut self, body: &mut B, rng: &mut fastrand::Rng) {
        self.state = AiState::WaitAttack;
        body.locomotion_mut().has_direction = false;
        self.state_time_left =
            range_f32(rng, self.profile.attack_wait_min, self.profile.attack_wait_max);
        self.wait_attack_time = 0.0;
    }

    /// Stationary turn to face a position; clears the jitter first.
    fn turn_toward<B: TitanBody + ?Sized>(&mut self, body: &mut B, position: Vec3) {
        self.steering.move_angle = 0.0;
        let heading = self.steering.chase_heading(body.position(), position);
        body.locomotion_mut().target_heading = heading;
        body.turn(geom::direction_of(heading));
    }

    /// Select and dispatch. Returns false only when nothing was selectable;
    /// a selected attack the body refuses drops the titan back to Idle.
    fn try_attack<B: TitanBody + ?Sized>(
        &mut self,
        body: &mut B,
        target: &CharacterInfo,
        far_only: bool,
        rng: &mut fastrand::Rng,
    ) -> bool {
        let Some(name) = self
            .select_attack(&*body, target, far_only, rng)
            .map(str::to_owned)
        else {
            return false;
        };
        body.locomotion_mut().has_direction = false;
        if body.can_attack() {
            self.state = AiState::Action;
            body.attack(&name);
            self.last_attack = Some(name);
        } else {
            self.idle(body, rng);
        }
        true
    }

    /// Planar angle between forward and the direction to `position`.
    fn enemy_angle<B: TitanBody + ?Sized>(&self, body: &B, position: Vec3) -> f32 {
        let mut direction = position - body.position();
        direction.y = 0.0;
        geom::angle_between(body.forward(), direction)
    }
}
