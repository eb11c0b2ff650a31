//! Frame timing.

use std::time::{Duration, Instant};

/// Per-frame numbers shown by the inspector.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    /// Seconds since the previous frame.
    pub delta: f32,
    /// Seconds since the timer started.
    pub total: f32,
    /// Frames counted over the last full second.
    pub fps: u32,
}

/// Measures frame deltas and counts frames per second.
///
/// The delta is not capped: a long stall produces one long frame.
#[derive(Debug)]
pub struct FrameTimer {
    last: Instant,
    total: f32,
    window: f32,
    frames: u32,
    fps: u32,
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTimer {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self { last: start, total: 0.0, window: 0.0, frames: 0, fps: 0 }
    }

    /// Start a new frame now.
    pub fn tick(&mut self) -> FrameStats {
        self.tick_at(Instant::now())
    }

    /// Start a new frame at `now`.
    pub fn tick_at(&mut self, now: Instant) -> FrameStats {
        let delta = now.saturating_duration_since(self.last);
        self.last = now;
        self.advance(delta)
    }

    fn advance(&mut self, delta: Duration) -> FrameStats {
        let dt = delta.as_secs_f32();
        self.total += dt;
        self.window += dt;
        self.frames += 1;

        if self.window > 1.0 {
            self.window -= 1.0;
            self.fps = self.frames;
            self.frames = 0;
        }

        self.stats(dt)
    }

    fn stats(&self, delta: f32) -> FrameStats {
        FrameStats { delta, total: self.total, fps: self.fps }
    }
}
