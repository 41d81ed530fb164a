pub mod timer;

use crate::ai::AiState;
use crate::ecs::components::{Health, Human, TitanBrain};

/// Headcount of the arena at one instant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Census {
    /// Titans per behaviour state, indexed by `AiState as usize`.
    pub states: [usize; AiState::ALL.len()],
    pub titans: usize,
    pub blocked: usize,
    pub humans_alive: usize,
    pub humans_dead: usize,
}

impl Census {
    pub fn take(world: &hecs::World) -> Self {
        let mut census = Census::default();
        for (_, brain) in world.query::<&TitanBrain>().iter() {
            census.titans += 1;
            census.states[brain.0.state() as usize] += 1;
            if brain.0.was_blocked() {
                census.blocked += 1;
            }
        }
        for (_, (health, _)) in world.query::<(&Health, &Human)>().iter() {
            if health.is_dead() {
                census.humans_dead += 1;
            } else {
                census.humans_alive += 1;
            }
        }
        census
    }

    pub fn count(&self, state: AiState) -> usize {
        self.states[state as usize]
    }

    /// Non-empty states as `Label: n` pairs.
    pub fn state_summary(&self) -> String {
        AiState::ALL
            .iter()
            .filter(|&&s| self.count(s) > 0)
            .map(|&s| format!("{}: {}", s.label(), self.count(s)))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
