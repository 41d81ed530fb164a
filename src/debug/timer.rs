use instant::Instant;

/// Which phase of the simulation tick is being timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SystemPhase {
    Spatial = 0,
    Detection = 1,
    Behavior = 2,
    Movement = 3,
    Actions = 4,
}

const PHASE_COUNT: usize = 5;

impl SystemPhase {
    pub const ALL: [SystemPhase; PHASE_COUNT] = [
        Self::Spatial,
        Self::Detection,
        Self::Behavior,
        Self::Movement,
        Self::Actions,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Spatial => "Spatial",
            Self::Detection => "Detect",
            Self::Behavior => "Behavior",
            Self::Movement => "Move",
            Self::Actions => "Actions",
        }
    }
}

/// Per-system timing with exponential moving average smoothing.
pub struct SystemTimers {
    /// EMA-smoothed duration in microseconds per phase.
    pub durations_us: [f64; PHASE_COUNT],
    start: Instant,
}

const EMA_ALPHA: f64 = 0.1;

impl SystemTimers {
    pub fn new() -> Self {
        Self {
            durations_us: [0.0; PHASE_COUNT],
            start: Instant::now(),
        }
    }

    /// Call before a system runs.
    pub fn begin(&mut self) {
        self.start = Instant::now();
    }

    /// Call after a system finishes. Records elapsed time for `phase`.
    pub fn end(&mut self, phase: SystemPhase) {
        let elapsed_us = self.start.elapsed().as_secs_f64() * 1_000_000.0;
        self.record(phase, elapsed_us);
    }

    fn record(&mut self, phase: SystemPhase, elapsed_us: f64) {
        let idx = phase as usize;
        self.durations_us[idx] =
            self.durations_us[idx] * (1.0 - EMA_ALPHA) + elapsed_us * EMA_ALPHA;
    }

    /// Sum of all phase durations (microseconds).
    pub fn total_us(&self) -> f64 {
        self.durations_us.iter().sum()
    }

    /// One-line breakdown, e.g. `Spatial 12.0us | Detect 30.5us | ...`.
    pub fn summary(&self) -> String {
        SystemPhase::ALL
            .iter()
            .map(|&p| format!("{} {:.1}us", p.label(), self.durations_us[p as usize]))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

impl Default for SystemTimers {
    fn default() -> Self {
        Self::new()
    }
}
