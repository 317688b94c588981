//! Card matching state and core types

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::deck::{Card, Face, build_deck};
use crate::sim::timer::{TimerId, Timers};
use crate::sim::tuning::PairsTuning;

/// Current phase of a matching round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PairsPhase {
    /// Waiting for card images
    #[default]
    Loading,
    /// All cards face-up for memorizing; input locked
    Revealing,
    /// Countdown running, cards selectable
    Playing,
    Won,
    TimedOut,
}

impl PairsPhase {
    pub fn is_finished(self) -> bool {
        matches!(self, PairsPhase::Won | PairsPhase::TimedOut)
    }
}

/// Delayed transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PairsTimer {
    /// Memorizing time is over
    RevealEnd,
    /// Hide a mismatched pair and unlock input
    FlipBack { first: usize, second: usize },
}

/// Things the presentation layer reacts to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PairsEvent {
    RevealStarted,
    RevealEnded,
    CardsHidden { first: usize, second: usize },
    Won { remaining_ms: f64 },
    TimedOut { matched_pairs: u32 },
}

/// Why a card click did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    NotPlaying,
    Locked,
    NoSuchCard,
    AlreadyRevealed,
    AlreadyMatched,
}

/// Result of selecting a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectOutcome {
    /// First card of a pair is up; waiting for the second
    First,
    /// Second card matched the first
    Matched { pairs: u32 },
    /// Second card differs; both flip back after the mismatch delay
    Mismatched,
    Rejected(RejectReason),
}

/// Complete matching game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairsState {
    pub tuning: PairsTuning,
    /// Shuffle seed of this round
    pub seed: u64,
    pub phase: PairsPhase,
    pub deck: Vec<Card>,
    /// Revealed card waiting for its partner
    pub first_selection: Option<usize>,
    pub matched_pairs: u32,
    /// Input lock
    pub locked: bool,
    /// Countdown start (host ms)
    pub timer_started_at: Option<f64>,
    /// Time left as of the last tick (ms)
    pub remaining_ms: f64,
    /// Memorizing time left as of the last tick (ms)
    pub reveal_remaining_ms: f64,
    pub(crate) reveal_ends_at: Option<f64>,
    pub(crate) pending_flip: Option<TimerId>,
    pub(crate) timers: Timers<PairsTimer>,
}

impl PairsState {
    /// Deal a fresh shuffled deck; stays in `Loading` until assets are ready
    pub fn new(tuning: PairsTuning, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        Self {
            tuning,
            seed,
            phase: PairsPhase::Loading,
            deck: build_deck(&mut rng),
            first_selection: None,
            matched_pairs: 0,
            locked: true,
            timer_started_at: None,
            remaining_ms: tuning.time_limit_ms,
            reveal_remaining_ms: tuning.reveal_ms,
            reveal_ends_at: None,
            pending_flip: None,
            timers: Timers::new(),
        }
    }

    /// Rebuild everything from setup. Pending reveal/flip-back events are
    /// cancelled so they cannot touch the new deck.
    pub fn restart(&mut self, seed: u64) {
        let mut timers = std::mem::take(&mut self.timers);
        timers.cancel_all();
        *self = Self::new(self.tuning, seed);
        self.timers = timers;
        log::info!("Pairs restarted with seed {}", seed);
    }

    pub fn total_pairs(&self) -> u32 {
        (self.deck.len() / 2) as u32
    }

    /// Fraction of the play budget left, for the progress bar
    pub fn ratio(&self) -> f64 {
        if self.tuning.time_limit_ms <= 0.0 {
            return 0.0;
        }
        (self.remaining_ms / self.tuning.time_limit_ms).clamp(0.0, 1.0)
    }

    /// Whether a flip-back is waiting to fire
    pub fn has_pending_flip(&self) -> bool {
        self.pending_flip.is_some_and(|id| self.timers.is_live(id))
    }

    /// Snapshot for the presentation layer
    pub fn view(&self) -> PairsView {
        let cards = self
            .deck
            .iter()
            .map(|card| CardView {
                id: card.id.clone(),
                key: card.character.key(),
                aria_label: card.aria_label(),
                face_up: card.face == Face::Revealed,
                matched: card.matched,
            })
            .collect();

        let limit_secs = self.tuning.time_limit_ms / 1000.0;
        let (timer_label, status) = match self.phase {
            PairsPhase::Loading => ("Loading images...".to_string(), None),
            PairsPhase::Revealing => (
                format!(
                    "Memorize the cards! {:.1}s",
                    self.reveal_remaining_ms.max(0.0) / 1000.0
                ),
                None,
            ),
            PairsPhase::Playing => (
                format!("Time left: {:.2}s", self.remaining_ms / 1000.0),
                None,
            ),
            PairsPhase::Won => (
                "Clear!".to_string(),
                Some(format!(
                    "Success! You matched every card within {limit_secs:.0} seconds."
                )),
            ),
            PairsPhase::TimedOut => (
                "Time's up".to_string(),
                Some("Time's up! Press RESTART to try again.".to_string()),
            ),
        };

        PairsView {
            phase: self.phase,
            cards,
            timer_label,
            ratio: self.ratio(),
            status,
            matched_pairs: self.matched_pairs,
            total_pairs: self.total_pairs(),
            input_locked: self.locked,
        }
    }
}

/// One card as the DOM should show it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardView {
    pub id: String,
    pub key: &'static str,
    pub aria_label: String,
    pub face_up: bool,
    pub matched: bool,
}

/// What the DOM needs to draw the matching board
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairsView {
    pub phase: PairsPhase,
    pub cards: Vec<CardView>,
    pub timer_label: String,
    /// Progress bar fill in [0, 1]
    pub ratio: f64,
    /// Result banner; `None` hides it
    pub status: Option<String>,
    pub matched_pairs: u32,
    pub total_pairs: u32,
    pub input_locked: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_round_is_loading_and_locked() {
        let state = PairsState::new(PairsTuning::default(), 1);
        assert_eq!(state.phase, PairsPhase::Loading);
        assert!(state.locked);
        assert_eq!(state.total_pairs(), 8);
        assert_eq!(state.ratio(), 1.0);

        let view = state.view();
        assert_eq!(view.cards.len(), 16);
        assert!(view.cards.iter().all(|c| !c.face_up));
        assert_eq!(view.timer_label, "Loading images...");
        assert!(view.status.is_none());
    }

    #[test]
    fn test_restart_deals_new_deck() {
        let mut state = PairsState::new(PairsTuning::default(), 1);
        let old_deck = state.deck.clone();
        state.matched_pairs = 3;
        state.restart(2);
        assert_eq!(state.seed, 2);
        assert_eq!(state.matched_pairs, 0);
        assert_ne!(state.deck, old_deck);
        assert_eq!(state.timers.generation(), 1);
    }

    #[test]
    fn test_view_serializes() {
        let state = PairsState::new(PairsTuning::default(), 1);
        let json = serde_json::to_string(&state.view()).unwrap();
        assert!(json.contains("\"phase\":\"Loading\""));
        assert!(json.contains("aria_label"));
    }
}
