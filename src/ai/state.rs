/// Current behaviour. Exactly one is active per controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum AiState {
    #[default]
    Idle,
    Wander,
    SitIdle,
    MoveToEnemy,
    MoveToPosition,
    Action,
    WaitAttack,
    ForcedIdle,
}

impl AiState {
    pub const ALL: [AiState; 8] = [
        Self::Idle,
        Self::Wander,
        Self::SitIdle,
        Self::MoveToEnemy,
        Self::MoveToPosition,
        Self::Action,
        Self::WaitAttack,
        Self::ForcedIdle,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Wander => "Wander",
            Self::SitIdle => "SitIdle",
            Self::MoveToEnemy => "MoveToEnemy",
            Self::MoveToPosition => "MoveToPosition",
            Self::Action => "Action",
            Self::WaitAttack => "WaitAttack",
            Self::ForcedIdle => "ForcedIdle",
        }
    }

    /// States with no target or order in play; they share one transition rule.
    pub fn is_passive(self) -> bool {
        matches!(self, Self::Idle | Self::Wander | Self::SitIdle)
    }
}

impl std::fmt::Display for AiState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
