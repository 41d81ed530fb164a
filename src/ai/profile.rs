use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned box in the creature's local frame. Bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl RangeBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, local: Vec3) -> bool {
        local.cmpge(self.min).all() && local.cmple(self.max).all()
    }
}

/// One row of the attack table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackDef {
    pub name: String,
    /// Relative selection weight, never negative.
    pub weight: f32,
    #[serde(default)]
    pub human_only: bool,
    /// Only usable from far range.
    #[serde(default)]
    pub far_only: bool,
    /// Target must sit inside at least one of these.
    pub ranges: Vec<RangeBox>,
}

impl AttackDef {
    pub fn new(name: impl Into<String>, weight: f32, ranges: Vec<RangeBox>) -> Self {
        Self {
            name: name.into(),
            weight,
            human_only: false,
            far_only: false,
            ranges,
        }
    }

    pub fn human_only(mut self) -> Self {
        self.human_only = true;
        self
    }

    pub fn far_only(mut self) -> Self {
        self.far_only = true;
        self
    }

    pub fn in_range(&self, local: Vec3) -> bool {
        self.ranges.iter().any(|r| r.contains(local))
    }
}

/// Tuning for one titan's behaviour. Populated once, read-only afterwards
/// (the detection radius is the one runtime-adjustable value).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorProfile {
    /// Radius of the detection set.
    pub detect_range: f32,
    /// Close attack range bounds, multiplied by body size when rolled.
    pub close_attack_range_min: f32,
    pub close_attack_range_max: f32,
    /// Planar range inside which far-only attacks are considered.
    pub far_attack_range: f32,
    /// A held target is dropped only beyond this distance.
    pub focus_range: f32,
    /// Seconds between target re-evaluations.
    pub focus_time: f32,
    /// Post-arrival delay bounds. A max of zero means attack on arrival.
    pub attack_wait_min: f32,
    pub attack_wait_max: f32,
    /// Seconds between chase heading re-rolls.
    pub chase_angle_time_min: f32,
    pub chase_angle_time_max: f32,
    /// No heading jitter or re-rolls inside this planar distance.
    pub chase_angle_min_range: f32,
    pub is_run: bool,
    /// Carried over from authored profiles. The decision logic never reads it.
    #[serde(default)]
    pub is_turn: bool,
    /// Facing error (degrees) above which the titan turns in place.
    pub turn_angle: f32,
    /// Ordered; order matters for weighted selection.
    pub attacks: Vec<AttackDef>,
}

impl BehaviorProfile {
    pub fn attack(&self, name: &str) -> Option<&AttackDef> {
        self.attacks.iter().find(|a| a.name == name)
    }

    /// A stock ground titan: close melee kit plus a far rock throw.
    pub fn default_titan() -> Self {
        let b = |min: [f32; 3], max: [f32; 3]| RangeBox::new(Vec3::from(min), Vec3::from(max));
        Self {
            detect_range: 600.0,
            close_attack_range_min: 20.0,
            close_attack_range_max: 30.0,
            far_attack_range: 250.0,
            focus_range: 150.0,
            focus_time: 5.0,
            attack_wait_min: 0.0,
            attack_wait_max: 0.0,
            chase_angle_time_min: 0.5,
            chase_angle_time_max: 2.0,
            chase_angle_min_range: 80.0,
            is_run: true,
            is_turn: true,
            turn_angle: 40.0,
            attacks: vec![
                AttackDef::new("Punch", 3.0, vec![b([-10.0, 0.0, 0.0], [10.0, 30.0, 28.0])]),
                AttackDef::new(
                    "Slap",
                    2.0,
                    vec![
                        b([-20.0, 10.0, 0.0], [-5.0, 40.0, 20.0]),
                        b([5.0, 10.0, 0.0], [20.0, 40.0, 20.0]),
                    ],
                ),
                AttackDef::new("Kick", 1.0, vec![b([-10.0, -5.0, 0.0], [10.0, 10.0, 22.0])]),
                AttackDef::new("Grab", 2.0, vec![b([-15.0, 0.0, 0.0], [15.0, 25.0, 20.0])])
                    .human_only(),
                AttackDef::new(
                    "RockThrow",
                    1.0,
                    vec![b([-80.0, -20.0, 60.0], [80.0, 80.0, 260.0])],
                )
                .far_only(),
            ],
        }
    }
}
