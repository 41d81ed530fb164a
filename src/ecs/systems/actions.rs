use crate::ai::{geom, ActionState};
use crate::ecs::components::{
    ActionSlot, Heading, Health, Position, TargetEnemy, TitanBrain, TitanFrame, TitanName,
};
use crate::spatial::Characters;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Damage dealt by a landed attack, before scaling by titan size.
const ATTACK_DAMAGE: f32 = 40.0;
/// How long a titan spends eating after a successful grab.
const EAT_DURATION: f32 = 3.0;

// ---------------------------------------------------------------------------
// Command types
// ---------------------------------------------------------------------------

enum ActionCmd {
    Damage {
        attacker: hecs::Entity,
        target: hecs::Entity,
        amount: f32,
    },
}

/// Pre-allocated, reused each tick.
pub struct ActionBuffers {
    commands: Vec<ActionCmd>,
}

impl ActionBuffers {
    pub fn new() -> Self {
        Self {
            commands: Vec::with_capacity(64),
        }
    }
}

impl Default for ActionBuffers {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Main entry point
// ---------------------------------------------------------------------------

/// Resolve pending hits, count down action timers and hand finished
/// titans back to their controllers.
pub fn update(world: &mut hecs::World, characters: &Characters, bufs: &mut ActionBuffers, dt: f32) {
    // Phase A: timers and hit checks against the snapshot
    for (entity, (name, pos, heading, frame, slot, target, brain)) in world.query_mut::<(
        &TitanName,
        &Position,
        &Heading,
        &TitanFrame,
        &mut ActionSlot,
        &TargetEnemy,
        &TitanBrain,
    )>() {
        if slot.state == ActionState::Idle {
            continue;
        }

        if slot.hit_pending {
            slot.hit_pending = false;
            let landed = match (slot.attack.as_deref(), target.0) {
                (Some(attack), Some(victim)) => characters
                    .get(victim)
                    .filter(|snap| !snap.dead)
                    .and_then(|snap| {
                        let local =
                            geom::to_local(pos.0, heading.0, frame.scale, snap.position);
                        brain
                            .0
                            .profile()
                            .attack(attack)
                            .filter(|def| def.in_range(local))
                    })
                    .map(|def| (victim, def.human_only)),
                _ => None,
            };
            if let Some((victim, grabbed)) = landed {
                bufs.commands.push(ActionCmd::Damage {
                    attacker: entity,
                    target: victim,
                    amount: ATTACK_DAMAGE * frame.scale,
                });
                if grabbed {
                    log::debug!("{} grabs its prey", name.0);
                    slot.state = ActionState::Eat;
                    slot.remaining = EAT_DURATION;
                }
            } else if let Some(attack) = &slot.attack {
                log::trace!("{} whiffs {attack}", name.0);
            }
        }

        slot.remaining -= dt;
        if slot.remaining <= 0.0 {
            slot.state = ActionState::Idle;
            slot.attack = None;
            slot.remaining = 0.0;
        }
    }

    // Phase B: apply damage
    for cmd in bufs.commands.drain(..) {
        match cmd {
            ActionCmd::Damage {
                attacker,
                target,
                amount,
            } => {
                let Ok(mut health) = world.get::<&mut Health>(target) else {
                    continue;
                };
                let was_alive = !health.is_dead();
                health.current = (health.current - amount).max(0.0);
                if was_alive && health.is_dead() {
                    log::debug!("{target:?} killed by {attacker:?}");
                }
            }
        }
    }
}
