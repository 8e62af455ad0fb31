//! Time management utilities

use std::time::Instant;

/// Upper bound applied to a single frame's delta time (5 FPS floor).
pub const DEFAULT_MAX_DELTA_TIME: f32 = 0.2;

/// Frame timer with a clamped delta.
///
/// Long stalls (breakpoints, window drags) would otherwise feed a huge step
/// into every system, so each delta is capped at `max_delta_time`.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
    max_delta_time: f32,
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DELTA_TIME)
    }
}

impl FrameTimer {
    /// Create a new timer with the given delta cap
    pub fn new(max_delta_time: f32) -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
            max_delta_time: max_delta_time.max(0.0),
        }
    }

    /// Restart measurement from now without touching the cap
    pub fn reset(&mut self) {
        self.last_frame = Instant::now();
        self.delta_time = 0.0;
        self.total_time = 0.0;
        self.frame_count = 0;
    }

    /// Measure the wall-clock time since the previous tick (once per frame)
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.advance(elapsed)
    }

    /// Advance by a caller-supplied delta; the cap still applies
    pub fn advance(&mut self, delta_time: f32) -> f32 {
        self.delta_time = self.clamp(delta_time);
        self.total_time += self.delta_time;
        self.frame_count += 1;
        self.delta_time
    }

    /// Clamp a delta into `[0, max_delta_time]`
    pub fn clamp(&self, delta_time: f32) -> f32 {
        delta_time.clamp(0.0, self.max_delta_time)
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed (clamped) time
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Largest delta a single frame may report
    pub fn max_delta_time(&self) -> f32 {
        self.max_delta_time
    }
}
