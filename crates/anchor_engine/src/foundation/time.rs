//! Time management utilities
//!
//! The overlay never reads the wall clock on its own: hosts advance these
//! clocks once per display frame, which keeps connection timeouts and frame
//! counting deterministic under test.

use std::time::{Duration, Instant};

/// Frame timer driven by the host's display loop
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_frame: Option<Instant>,
    delta: Duration,
    total: Duration,
    frame_count: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Create a new clock at frame zero
    pub fn new() -> Self {
        Self {
            last_frame: None,
            delta: Duration::ZERO,
            total: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Advance the clock using the wall clock (call once per frame)
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let delta = self
            .last_frame
            .map_or(Duration::ZERO, |last| now.duration_since(last));
        self.last_frame = Some(now);
        self.advance(delta)
    }

    /// Advance the clock by an explicit frame interval
    pub fn advance(&mut self, delta: Duration) -> Duration {
        self.delta = delta;
        self.total += delta;
        self.frame_count += 1;
        delta
    }

    /// Time covered by the last frame
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Total time since the clock started
    pub fn total(&self) -> Duration {
        self.total
    }

    /// Number of frames ticked so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Countdown that expires after a fixed budget of accumulated time
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    budget: Duration,
    elapsed: Duration,
}

impl Deadline {
    /// Start a new countdown
    pub fn new(budget: Duration) -> Self {
        Self {
            budget,
            elapsed: Duration::ZERO,
        }
    }

    /// Accumulate elapsed time
    pub fn advance(&mut self, delta: Duration) {
        self.elapsed = self.elapsed.saturating_add(delta);
    }

    /// Whether the budget has been used up
    pub fn is_expired(&self) -> bool {
        self.elapsed >= self.budget
    }

    /// Time accumulated so far
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Time left before expiry
    pub fn remaining(&self) -> Duration {
        self.budget.saturating_sub(self.elapsed)
    }
}
