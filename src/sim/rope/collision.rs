//! Rope vs. player collision
//!
//! The rope is only dangerous while its bottom sweeps the ground, i.e. within
//! the hit window around the ground-crossing angle. Inside that window the
//! player is caught unless their feet are at or above the safe height.

use serde::{Deserialize, Serialize};

use crate::{angular_distance, normalize_degrees};
use crate::sim::tuning::RopeTuning;

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionResult {
    /// Whether the rope caught the player
    pub hit: bool,
    /// Shortest angular distance from the rope to the ground crossing (degrees)
    pub distance: f32,
    /// Whether the rope is inside the hit window
    pub in_window: bool,
}

impl CollisionResult {
    pub fn miss(distance: f32) -> Self {
        Self {
            hit: false,
            distance,
            in_window: false,
        }
    }
}

/// Check whether a rope at `angle` (degrees) catches a player at `height` (px)
pub fn rope_player_collision(angle: f32, height: f32, tuning: &RopeTuning) -> CollisionResult {
    let distance = angular_distance(angle, tuning.ground_angle);
    if distance > tuning.hit_window {
        return CollisionResult::miss(distance);
    }
    CollisionResult {
        hit: height < tuning.safe_height,
        distance,
        in_window: true,
    }
}

/// Upper bound on samples for one swept check
const MAX_SWEEP_SAMPLES: u32 = 4096;

/// Check every point of the arc a rope sweeps in one frame, starting at
/// `start_angle` and turning `sweep` degrees.
///
/// Samples are at most one hit window apart, so a fast rope cannot step over
/// the window between frames. `height_at(t)` is the player's height at
/// fraction `t` of the frame; the last sample (`t = 1`) is the end of the
/// frame. Returns the first hit, or the end-of-frame result.
pub fn swept_collision(
    start_angle: f32,
    sweep: f32,
    height_at: impl Fn(f32) -> f32,
    tuning: &RopeTuning,
) -> CollisionResult {
    let step = tuning.hit_window.max(1.0);
    let samples = if sweep.is_finite() && sweep > 0.0 {
        ((sweep / step).ceil() as u32).clamp(1, MAX_SWEEP_SAMPLES)
    } else {
        1
    };

    let mut result = CollisionResult::miss(f32::MAX);
    for k in 1..=samples {
        let t = k as f32 / samples as f32;
        let angle = normalize_degrees(start_angle + sweep.max(0.0) * t);
        result = rope_player_collision(angle, height_at(t), tuning);
        if result.hit {
            break;
        }
    }
    result
}
