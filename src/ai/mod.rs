//! Titan behaviour core: state machine, steering, targeting and attack selection.

pub mod attack;
pub mod body;
pub mod controller;
pub mod geom;
pub mod profile;
pub mod state;
pub mod steering;
pub mod targeting;

pub use body::{
    ActionState, CharacterInfo, Footprint, Locomotion, Roster, Senses, SpatialProbe, TitanBody,
    TitanVariant,
};
pub use controller::{MoveOrder, TitanController};
pub use profile::{AttackDef, BehaviorProfile, RangeBox};
pub use state::AiState;
