use glam::Vec3;

use crate::ai::{ActionState, TitanController, TitanVariant};

/// World position. Y is up.
#[derive(Debug, Clone, Copy)]
pub struct Position(pub Vec3);

/// Yaw in degrees, [0, 360). 0 faces +Z.
#[derive(Debug, Clone, Copy)]
pub struct Heading(pub f32);

/// Which side a character fights for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Team {
    Titans,
    Humans,
}

/// Marks a human character (as opposed to another titan or a shifter).
#[derive(Debug, Clone, Copy)]
pub struct Human;

#[derive(Debug, Clone, Copy)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }
}

/// Titan body plan and collision shape.
#[derive(Debug, Clone, Copy)]
pub struct TitanFrame {
    /// Uniform size multiplier (1.0 = stock titan).
    pub scale: f32,
    pub variant: TitanVariant,
    /// Ground-plane collision radius before scaling.
    pub collider_radius: f32,
}

impl TitanFrame {
    pub fn radius(&self) -> f32 {
        self.collider_radius * self.scale
    }
}

/// What the titan's animation/combat side is doing, and for how long.
#[derive(Debug, Clone, Default)]
pub struct ActionSlot {
    pub state: ActionState,
    /// Seconds until the action ends.
    pub remaining: f32,
    /// Attack in flight, if any.
    pub attack: Option<String>,
    /// Damage not yet resolved for the current attack.
    pub hit_pending: bool,
}

/// Target published by the controller for combat resolution.
#[derive(Debug, Clone, Copy, Default)]
pub struct TargetEnemy(pub Option<hecs::Entity>);

/// Opposing characters inside the titan's detection radius, rebuilt each tick.
#[derive(Debug, Clone, Default)]
pub struct DetectedEnemies(pub Vec<hecs::Entity>);

/// The behaviour controller driving a titan.
pub struct TitanBrain(pub TitanController);

/// Name for log lines.
#[derive(Debug, Clone)]
pub struct TitanName(pub String);

/// Simple aimless movement for humans.
#[derive(Debug, Clone, Copy)]
pub struct Stroll {
    pub velocity: Vec3,
    /// Time until a new direction is picked (seconds).
    pub timer: f32,
}
