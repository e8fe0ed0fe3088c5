use std::time::{Duration, Instant};

/// Monotonic time since session start.
///
/// `Wall` reads the OS monotonic clock. `Simulated` advances only with the
/// frame deltas fed to [`SessionClock::advance`], which keeps scripted runs
/// reproducible.
#[derive(Debug, Clone, Copy)]
pub enum SessionClock {
    Wall { started: Instant },
    Simulated { elapsed: Duration },
}

impl SessionClock {
    pub fn wall() -> Self {
        Self::Wall {
            started: Instant::now(),
        }
    }

    pub fn simulated() -> Self {
        Self::Simulated {
            elapsed: Duration::ZERO,
        }
    }

    /// Record a frame delta. No effect on a wall clock. Saturates at
    /// `Duration::MAX` instead of overflowing.
    pub fn advance(&mut self, dt: f32) {
        if let Self::Simulated { elapsed } = self {
            if dt.is_finite() && dt > 0.0 {
                let step = Duration::try_from_secs_f32(dt).unwrap_or(Duration::MAX);
                *elapsed = elapsed.saturating_add(step);
            }
        }
    }

    pub fn elapsed(&self) -> Duration {
        match self {
            Self::Wall { started } => started.elapsed(),
            Self::Simulated { elapsed } => *elapsed,
        }
    }
}
