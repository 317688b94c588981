//! Card matching: memorize a face-up board, then find every pair before the
//! countdown runs out.

pub mod deck;
pub mod state;
pub mod tick;

pub use deck::{
    CARD_BACK_URL, CHARACTERS, Card, Character, CharacterId, Face, asset_urls, build_deck,
};
pub use state::{
    CardView, PairsEvent, PairsPhase, PairsState, PairsTimer, PairsView, RejectReason,
    SelectOutcome,
};
pub use tick::{assets_loaded, select, tick};
