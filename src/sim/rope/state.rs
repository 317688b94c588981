//! Rope game state and core simulation types

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::ROPE_RADIUS;
use crate::sim::tuning::RopeTuning;
use crate::{normalize_degrees, polar_to_cartesian};

/// Current phase of a rope run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RopePhase {
    /// Waiting for the first jump
    #[default]
    NotStarted,
    /// Rope is turning
    Running,
    /// Rope caught the player; waits for reset
    GameOver,
}

/// Things the presentation layer reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RopeEvent {
    Started,
    Jumped,
    Landed,
    /// A full revolution completed
    Revolution { score: u32 },
    GameOver { score: u32, new_best: bool },
    Reset,
}

/// The turning rope
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rope {
    /// Degrees in [0, 360)
    pub angle: f32,
    /// Degrees per second
    pub angular_vel: f32,
}

impl Rope {
    pub fn new(tuning: &RopeTuning) -> Self {
        Self {
            angle: normalize_degrees(tuning.start_angle),
            angular_vel: tuning.start_speed,
        }
    }

    /// Turn the rope by `dt` seconds. Returns the number of completed
    /// revolutions; each one speeds the rope up by `speed_up`, capped at
    /// `max_speed`.
    ///
    /// Long frames are wrapped in one go so a stalled tab still counts every
    /// revolution exactly once. The sweep of a long frame uses the speed from
    /// the start of the frame.
    pub fn advance(&mut self, dt: f32, tuning: &RopeTuning) -> u32 {
        if dt.is_nan() || dt <= 0.0 {
            return 0;
        }
        let swept = self.angle + self.angular_vel * dt;
        let revolutions = (swept / 360.0).floor().max(0.0) as u32;
        self.angle = normalize_degrees(swept - 360.0 * revolutions as f32);

        if revolutions > 0 {
            let boosted = self.angular_vel + tuning.speed_up * revolutions as f32;
            self.angular_vel = boosted.min(tuning.max_speed).max(self.angular_vel);
        }
        revolutions
    }

    /// Lowest point of the rope in stage coordinates (origin on the ground
    /// under the player, y up). Sits on the ground at the ground-crossing angle.
    pub fn low_point(&self, tuning: &RopeTuning) -> Vec2 {
        let relative = self.angle - tuning.ground_angle;
        polar_to_cartesian(ROPE_RADIUS, relative - 90.0) + Vec2::new(0.0, ROPE_RADIUS)
    }
}

/// The jumping player (only vertical motion matters)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Player {
    /// Feet above ground (px), never negative
    pub height: f32,
    /// px/s, positive is up
    pub vertical_vel: f32,
}

impl Player {
    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.height <= 0.0
    }

    /// Start a jump if standing on the ground. Returns whether it took effect.
    pub fn try_jump(&mut self, jump_speed: f32) -> bool {
        if !self.is_grounded() {
            return false;
        }
        self.height = 0.0;
        self.vertical_vel = jump_speed;
        true
    }

    /// Apply gravity for `dt` seconds. Returns true on the frame the player lands.
    pub fn integrate(&mut self, gravity: f32, dt: f32) -> bool {
        if dt <= 0.0 {
            return false;
        }
        let was_airborne = self.height > 0.0;
        self.vertical_vel -= gravity * dt;
        self.height += self.vertical_vel * dt;
        if self.height <= 0.0 {
            self.height = 0.0;
            self.vertical_vel = 0.0;
            return was_airborne;
        }
        false
    }
}

/// Complete rope game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RopeState {
    pub tuning: RopeTuning,
    pub phase: RopePhase,
    pub rope: Rope,
    pub player: Player,
    /// Revolutions completed this run
    pub score: u32,
    /// Best score across runs
    pub best: u32,
}

impl RopeState {
    pub fn new(tuning: RopeTuning, best: u32) -> Self {
        Self {
            tuning,
            phase: RopePhase::NotStarted,
            rope: Rope::new(&tuning),
            player: Player::default(),
            score: 0,
            best,
        }
    }

    /// Back to the start pose, keeping the best score
    pub fn reset(&mut self) {
        *self = Self::new(self.tuning, self.best);
    }

    /// Snapshot for the presentation layer
    pub fn view(&self) -> RopeView {
        let overlay = match self.phase {
            RopePhase::NotStarted => Some("Press space or tap to start!".to_string()),
            RopePhase::Running => None,
            RopePhase::GameOver => Some(format!("Game over! Score: {}", self.score)),
        };
        RopeView {
            phase: self.phase,
            angle: self.rope.angle,
            height: self.player.height,
            score: self.score,
            best: self.best,
            rope_low_point: self.rope.low_point(&self.tuning),
            status: "Space or tap to jump!",
            overlay,
        }
    }
}

/// What the DOM needs to draw a frame of the rope game
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RopeView {
    pub phase: RopePhase,
    /// Rope rotation (degrees)
    pub angle: f32,
    /// Player lift (px)
    pub height: f32,
    pub score: u32,
    pub best: u32,
    pub rope_low_point: Vec2,
    pub status: &'static str,
    /// Overlay text; `None` hides the overlay
    pub overlay: Option<String>,
}
