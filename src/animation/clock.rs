use crate::foundation::{
    error::{RevealError, RevealResult},
    math::cycle_progress,
};

/// Monotonic, restartable animation clock.
///
/// The clock never reads wall time itself; the host scheduler passes its own timestamp
/// (milliseconds, any epoch) to [`AnimationClock::start`] and [`AnimationClock::elapsed`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationClock {
    cycle_ms: f64,
    baseline_ms: f64,
    running: bool,
}

impl AnimationClock {
    /// Create a stopped clock with the given cycle length.
    pub fn new(cycle_ms: f64) -> RevealResult<Self> {
        if !cycle_ms.is_finite() || cycle_ms <= 0.0 {
            return Err(RevealError::validation("cycle duration must be finite and > 0 ms"));
        }
        Ok(Self {
            cycle_ms,
            baseline_ms: 0.0,
            running: false,
        })
    }

    /// Cycle length in milliseconds.
    pub fn cycle_ms(&self) -> f64 {
        self.cycle_ms
    }

    /// (Re)start the clock; elapsed time is measured from `now_ms` from here on.
    pub fn start(&mut self, now_ms: f64) {
        self.baseline_ms = if now_ms.is_finite() { now_ms } else { 0.0 };
        self.running = true;
    }

    /// Stop the clock. Progress is not retained across a later [`AnimationClock::start`].
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Whether the clock is running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Elapsed milliseconds since the last start, or `None` while stopped.
    pub fn elapsed(&self, now_ms: f64) -> Option<f64> {
        if !self.running {
            return None;
        }
        let e = now_ms - self.baseline_ms;
        Some(if e.is_finite() { e.max(0.0) } else { 0.0 })
    }

    /// Cycle progress in `[0, 1)` for an elapsed time.
    pub fn progress_at(&self, elapsed_ms: f64) -> f64 {
        cycle_progress(elapsed_ms, self.cycle_ms)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/clock.rs"]
mod tests;
