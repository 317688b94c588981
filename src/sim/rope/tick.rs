//! Variable timestep rope simulation
//!
//! The host hands in whatever `dt` elapsed since the previous animation
//! frame. Exact collision timing therefore depends on frame rate; tests feed
//! fixed `dt` sequences instead of a live clock.

use super::collision::swept_collision;
use super::state::{RopeEvent, RopePhase, RopeState};

/// Input commands for a single frame
#[derive(Debug, Clone, Copy, Default)]
pub struct RopeInput {
    /// Activate (space / tap): starts the run if needed, then jumps
    pub jump: bool,
    /// Back to `NotStarted`
    pub reset: bool,
    /// Overlay restart button: reset and start without jumping
    pub restart: bool,
}

/// Advance the rope game by one frame
///
/// Order matters: inputs, rope angle (score), player physics, collision.
pub fn tick(state: &mut RopeState, input: &RopeInput, dt: f32) -> Vec<RopeEvent> {
    let mut events = Vec::new();
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

    if input.reset || input.restart {
        state.reset();
        events.push(RopeEvent::Reset);
        if input.restart {
            start(state, &mut events);
        }
        // The reset frame does not simulate; the next frame starts from dt = 0
        return events;
    }

    if input.jump {
        match state.phase {
            RopePhase::NotStarted => {
                start(state, &mut events);
                jump(state, &mut events);
            }
            RopePhase::Running => jump(state, &mut events),
            RopePhase::GameOver => log::debug!("Jump ignored after game over"),
        }
    }

    if state.phase != RopePhase::Running {
        return events;
    }

    let tuning = state.tuning;
    let start_angle = state.rope.angle;
    let sweep = state.rope.angular_vel * dt;
    let (h0, v0) = (state.player.height, state.player.vertical_vel);

    let revolutions = state.rope.advance(dt, &tuning);
    for _ in 0..revolutions {
        state.score += 1;
        events.push(RopeEvent::Revolution { score: state.score });
    }

    if state.player.integrate(tuning.gravity, dt) {
        events.push(RopeEvent::Landed);
    }

    // Same update as `Player::integrate`, evaluated part way through the frame
    let height_at = |t: f32| {
        let s = dt * t;
        (h0 + (v0 - tuning.gravity * s) * s).max(0.0)
    };
    let collision = swept_collision(start_angle, sweep, height_at, &tuning);
    if collision.hit {
        game_over(state, &mut events);
    }

    events
}

fn start(state: &mut RopeState, events: &mut Vec<RopeEvent>) {
    state.phase = RopePhase::Running;
    events.push(RopeEvent::Started);
    log::info!("Rope run started");
}

fn jump(state: &mut RopeState, events: &mut Vec<RopeEvent>) {
    if state.player.try_jump(state.tuning.jump_speed) {
        events.push(RopeEvent::Jumped);
    } else {
        log::debug!("Jump ignored while airborne (h={:.1})", state.player.height);
    }
}

fn game_over(state: &mut RopeState, events: &mut Vec<RopeEvent>) {
    state.phase = RopePhase::GameOver;
    let new_best = state.score > state.best;
    if new_best {
        state.best = state.score;
    }
    log::info!(
        "Rope game over: score {} (best {}{})",
        state.score,
        state.best,
        if new_best { ", new best" } else { "" }
    );
    events.push(RopeEvent::GameOver {
        score: state.score,
        new_best,
    });
}
