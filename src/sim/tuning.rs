//! Gameplay balance
//!
//! Values default to the constants in `crate::consts`. Variants are plain
//! constructors; nothing here is loaded at runtime.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Rope physics and collision parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RopeTuning {
    /// px/s²
    pub gravity: f32,
    /// px/s
    pub jump_speed: f32,
    /// degrees/s
    pub start_speed: f32,
    /// degrees/s gained per revolution
    pub speed_up: f32,
    /// degrees/s
    pub max_speed: f32,
    /// degrees
    pub ground_angle: f32,
    /// degrees either side of `ground_angle`
    pub hit_window: f32,
    /// px
    pub safe_height: f32,
    /// degrees
    pub start_angle: f32,
}

impl Default for RopeTuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_speed: JUMP_SPEED,
            start_speed: START_SPEED,
            speed_up: SPEED_UP,
            max_speed: MAX_SPEED,
            ground_angle: GROUND_ANGLE,
            hit_window: HIT_WINDOW,
            safe_height: SAFE_HEIGHT,
            start_angle: START_ANGLE,
        }
    }
}

/// Card matching parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairsTuning {
    pub reveal_ms: f64,
    pub time_limit_ms: f64,
    pub mismatch_delay_ms: f64,
}

impl Default for PairsTuning {
    fn default() -> Self {
        Self {
            reveal_ms: REVEAL_MS,
            time_limit_ms: TIME_LIMIT_MS,
            mismatch_delay_ms: MISMATCH_DELAY_MS,
        }
    }
}

impl PairsTuning {
    /// Longer memorization and play time (3s reveal, 10s budget)
    pub fn relaxed() -> Self {
        Self {
            reveal_ms: 3000.0,
            time_limit_ms: 10_000.0,
            ..Self::default()
        }
    }
}
