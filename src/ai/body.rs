//! The seams between the behaviour core and the simulation around it.
//!
//! The controller never owns the creature or the world. Each tick it borrows
//! the creature through [`TitanBody`] and reads the world through [`Senses`].

use glam::Vec3;

use super::geom;

/// What the creature's own combat/animation side is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionState {
    #[default]
    Idle,
    Attack,
    Eat,
    Other,
}

/// Body plan. Crawlers and shifters never sit down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TitanVariant {
    #[default]
    Normal,
    Crawler,
    Shifter,
}

impl TitanVariant {
    pub fn can_sit(self) -> bool {
        self == TitanVariant::Normal
    }

    pub fn label(self) -> &'static str {
        match self {
            TitanVariant::Normal => "Normal",
            TitanVariant::Crawler => "Crawler",
            TitanVariant::Shifter => "Shifter",
        }
    }
}

/// Movement intent written by the controller, consumed by locomotion.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Locomotion {
    /// Desired world heading in degrees, [0, 360).
    pub target_heading: f32,
    /// False means stand still.
    pub has_direction: bool,
    pub walk: bool,
    pub sit: bool,
}

/// World-space collision footprint used for forward probing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub center: Vec3,
    pub radius: f32,
}

/// The controlled creature, borrowed for one tick.
pub trait TitanBody {
    fn position(&self) -> Vec3;

    /// Yaw in degrees; titans are always upright.
    fn heading(&self) -> f32;

    fn forward(&self) -> Vec3 {
        geom::direction_of(self.heading())
    }

    /// Uniform scale.
    fn size(&self) -> f32;

    fn is_dead(&self) -> bool;

    fn action(&self) -> ActionState;

    fn variant(&self) -> TitanVariant;

    fn footprint(&self) -> Footprint;

    /// Cooldown/animation gate for dispatching an attack right now.
    fn can_attack(&self) -> bool;

    fn locomotion_mut(&mut self) -> &mut Locomotion;

    /// Stationary turn to face `direction`.
    fn turn(&mut self, direction: Vec3);

    /// Start the named attack.
    fn attack(&mut self, name: &str);

    /// Publish the current target to combat resolution.
    fn set_target_enemy(&mut self, enemy: Option<hecs::Entity>);
}

/// What the core needs to know about any character it might target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterInfo {
    pub position: Vec3,
    pub dead: bool,
    pub human: bool,
}

/// Entity registry lookup. `None` means the entity is gone.
pub trait Roster {
    fn lookup(&self, entity: hecs::Entity) -> Option<CharacterInfo>;
}

/// Synchronous, read-only spatial queries against world geometry.
pub trait SpatialProbe {
    /// Sweep a sphere of `radius` from `origin` along `direction` (unit) and
    /// return the distance to the nearest hit within `max_distance`.
    fn sphere_cast(&self, origin: Vec3, radius: f32, direction: Vec3, max_distance: f32)
        -> Option<f32>;
}

/// Everything a controller reads from the world during one tick.
pub struct Senses<'a> {
    pub roster: &'a dyn Roster,
    /// Live detection set for this creature.
    pub detected: &'a [hecs::Entity],
    pub probe: &'a dyn SpatialProbe,
}
