//! Fixed-rate frame clock.

use std::time::{Duration, Instant};

/// Throttles the loop to a target tick rate by sleeping away whatever is
/// left of each frame's budget.
pub struct FrameClock {
    frame: Duration,
    last_tick: Instant,
}

impl FrameClock {
    pub fn new(fps: u32) -> Self {
        FrameClock {
            frame: Duration::from_secs(1) / fps.max(1),
            last_tick: Instant::now(),
        }
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame
    }

    /// Time still to wait when `elapsed` has already been spent this frame.
    pub fn remaining(&self, elapsed: Duration) -> Duration {
        self.frame.saturating_sub(elapsed)
    }

    /// Sleep until one frame has passed since the previous call.
    pub fn tick(&mut self) {
        let wait = self.remaining(self.last_tick.elapsed());
        if !wait.is_zero() {
            std::thread::sleep(wait);
        }
        self.last_tick = Instant::now();
    }
}
