//! Input mapping
//!
//! Event handlers only latch actions; the frame callback drains them so every
//! state change happens inside one tick.

use crate::sim::rope::RopeInput;

/// Discrete player actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Space / pointer press: jump, or select the card under the pointer
    Activate,
    /// Restart button next to the stage
    Reset,
    /// Restart button on the game-over overlay
    Restart,
}

/// Map a `KeyboardEvent.code` to an action
pub fn action_for_key(code: &str) -> Option<Action> {
    match code {
        "Space" => Some(Action::Activate),
        _ => None,
    }
}

/// One-shot actions collected between frames
#[derive(Debug, Clone, Copy, Default)]
pub struct PendingInput {
    activate: bool,
    reset: bool,
    restart: bool,
}

impl PendingInput {
    pub fn push(&mut self, action: Action) {
        match action {
            Action::Activate => self.activate = true,
            Action::Reset => self.reset = true,
            Action::Restart => self.restart = true,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.activate || self.reset || self.restart)
    }

    /// Drain into rope commands
    pub fn take_rope_input(&mut self) -> RopeInput {
        let input = RopeInput {
            jump: self.activate,
            reset: self.reset,
            restart: self.restart,
        };
        *self = Self::default();
        input
    }
}
