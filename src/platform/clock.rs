//! Frame timing
//!
//! Turns the monotonic timestamps handed to animation callbacks into the
//! `dt` the rope simulation integrates with.

use crate::consts::MAX_FRAME_DT;

/// Converts host timestamps (ms) into per-frame deltas (seconds)
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_ms: Option<f64>,
    max_dt: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(MAX_FRAME_DT)
    }
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self {
            last_ms: None,
            max_dt,
        }
    }

    /// Forget the previous frame; the next `frame` call returns 0
    pub fn reset(&mut self) {
        self.last_ms = None;
    }

    /// Seconds since the previous frame, clamped to `[0, max_dt]` so a
    /// backgrounded tab does not fling the rope around on return
    pub fn frame(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        if dt > self.max_dt {
            log::debug!("Frame gap of {:.3}s clamped to {:.3}s", dt, self.max_dt);
        }
        dt.clamp(0.0, self.max_dt)
    }
}
