//! Jump rope: a rope turns around the player, who must be in the air each
//! time it sweeps the ground.

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{CollisionResult, rope_player_collision};
pub use state::{Player, Rope, RopeEvent, RopePhase, RopeState, RopeView};
pub use tick::{RopeInput, tick};
