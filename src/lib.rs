//! PPM Minigames - jump rope and card matching for the browser
//!
//! Core modules:
//! - `sim`: Pure simulation cores (rope physics, pairs state machine, timers)
//! - `platform`: Host services (frame clock, storage, input, asset preloading)
//! - `highscores`: Persisted best score for the rope game

pub mod highscores;
pub mod platform;
pub mod sim;

pub use highscores::BestScore;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    // --- Jump rope ---

    /// Player gravity (px/s²)
    pub const GRAVITY: f32 = 2300.0;
    /// Initial vertical speed of a jump (px/s)
    pub const JUMP_SPEED: f32 = 930.0;
    /// Rope angular velocity at the start of a run (degrees/s)
    pub const START_SPEED: f32 = 150.0;
    /// Angular velocity gained per completed revolution (degrees/s)
    pub const SPEED_UP: f32 = 8.0;
    /// Angular velocity cap (degrees/s)
    pub const MAX_SPEED: f32 = 480.0;
    /// Angle at which the rope's bottom sweeps the ground (degrees)
    pub const GROUND_ANGLE: f32 = 0.0;
    /// Collision is checked within this many degrees of the ground crossing
    pub const HIT_WINDOW: f32 = 18.0;
    /// Feet at or above this height (px) clear the rope
    pub const SAFE_HEIGHT: f32 = 46.0;
    /// Rope angle when a run begins: top of the swing, so a jump-start lands
    /// before the first ground crossing
    pub const START_ANGLE: f32 = 180.0;
    /// Rope radius used for the view geometry (px)
    pub const ROPE_RADIUS: f32 = 120.0;

    /// Largest frame delta fed to the simulation (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    // --- Card matching ---

    /// All cards face-up before play starts (ms)
    pub const REVEAL_MS: f64 = 1000.0;
    /// Play time budget (ms)
    pub const TIME_LIMIT_MS: f64 = 7000.0;
    /// How long a mismatched pair stays visible (ms)
    pub const MISMATCH_DELAY_MS: f64 = 550.0;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if a >= 360.0 { 0.0 } else { a }
}

/// Shortest-path separation between two angles in degrees, in [0, 180]
#[inline]
pub fn angular_distance(a: f32, b: f32) -> f32 {
    let d = normalize_degrees(a - b);
    d.min(360.0 - d)
}

/// Convert polar (r, degrees) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, degrees: f32) -> Vec2 {
    let theta = degrees.to_radians();
    Vec2::new(r * theta.cos(), r * theta.sin())
}
