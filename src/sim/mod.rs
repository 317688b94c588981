//! Simulation cores
//!
//! All gameplay logic lives here. Nothing in this module touches the DOM or
//! reads a clock:
//! - Time comes in as `dt` seconds (rope) or host timestamps in ms (pairs)
//! - Randomness comes from a seeded RNG
//! - Delayed transitions are cancellable `Timers` entries

pub mod pairs;
pub mod rope;
pub mod timer;
pub mod tuning;

pub use pairs::{PairsEvent, PairsPhase, PairsState, PairsView, SelectOutcome};
pub use rope::{RopeEvent, RopeInput, RopePhase, RopeState, RopeView};
pub use timer::{TimerId, Timers};
pub use tuning::{PairsTuning, RopeTuning};
