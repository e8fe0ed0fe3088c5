use std::collections::VecDeque;
use std::time::Duration;

/// One paced frame: the delta fed to the session and the time spent
/// stepping and flushing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSample {
    pub dt: Duration,
    pub work: Duration,
}

/// Pacing statistics for a fixed-rate session loop.
///
/// Keeps a rolling window of recent samples for averages and lifetime
/// counters for frames that overran the budget.
#[derive(Debug)]
pub struct FrameTimer {
    budget: Duration,
    recent: VecDeque<FrameSample>,
    window: usize,
    frames: u64,
    over_budget: u64,
}

impl FrameTimer {
    /// `window` is clamped to at least one sample.
    pub fn new(budget: Duration, window: usize) -> Self {
        let window = window.max(1);
        Self {
            budget,
            recent: VecDeque::with_capacity(window),
            window,
            frames: 0,
            over_budget: 0,
        }
    }

    /// Budget of `1 / fps`, averaged over one second of frames.
    pub fn for_fps(fps: u32) -> Self {
        let fps = fps.max(1);
        Self::new(Duration::from_secs(1) / fps, fps as usize)
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Record a frame. Returns true when its work overran the budget.
    pub fn record(&mut self, dt: Duration, work: Duration) -> bool {
        if self.recent.len() == self.window {
            self.recent.pop_front();
        }
        self.recent.push_back(FrameSample { dt, work });
        self.frames += 1;
        let over = work > self.budget;
        if over {
            self.over_budget += 1;
        }
        over
    }

    /// How long to sleep after a frame that took `work`.
    pub fn remaining(&self, work: Duration) -> Duration {
        self.budget.saturating_sub(work)
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn over_budget(&self) -> u64 {
        self.over_budget
    }

    fn mean(&self, pick: impl Fn(&FrameSample) -> Duration) -> Duration {
        if self.recent.is_empty() {
            return Duration::ZERO;
        }
        self.recent.iter().map(pick).sum::<Duration>() / self.recent.len() as u32
    }

    pub fn mean_dt(&self) -> Duration {
        self.mean(|s| s.dt)
    }

    pub fn mean_work(&self) -> Duration {
        self.mean(|s| s.work)
    }

    pub fn worst_work(&self) -> Duration {
        self.recent.iter().map(|s| s.work).max().unwrap_or_default()
    }

    /// Achieved frame rate over the window.
    pub fn fps(&self) -> f32 {
        let dt = self.mean_dt().as_secs_f32();
        if dt > 0.0 { 1.0 / dt } else { 0.0 }
    }

    pub fn stats(&self) -> FrameStats {
        FrameStats {
            frames: self.frames,
            over_budget: self.over_budget,
            fps: self.fps(),
            mean_work: self.mean_work(),
            worst_work: self.worst_work(),
            budget: self.budget,
        }
    }
}

/// Snapshot of loop pacing for logs.
#[derive(Debug, Clone, Copy)]
pub struct FrameStats {
    pub frames: u64,
    pub over_budget: u64,
    pub fps: f32,
    pub mean_work: Duration,
    pub worst_work: Duration,
    pub budget: Duration,
}

impl std::fmt::Display for FrameStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Frames: {} ({} over budget) fps={:.1} work avg={:?} worst={:?} budget={:?}",
            self.frames, self.over_budget, self.fps, self.mean_work, self.worst_work, self.budget,
        )
    }
}
