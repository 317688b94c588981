//! Matching round transitions
//!
//! `assets_loaded` and `select` are input handlers; `tick` runs once per
//! animation frame with the host timestamp. All delayed work goes through the
//! state's `Timers`, so a restart cancels it deterministically.

use super::deck::Face;
use super::state::{PairsEvent, PairsPhase, PairsState, PairsTimer, RejectReason, SelectOutcome};

/// Images are ready (or failed; either way): show every card and start the
/// memorizing countdown
pub fn assets_loaded(state: &mut PairsState, now_ms: f64) -> Vec<PairsEvent> {
    if state.phase != PairsPhase::Loading {
        log::debug!("Ignoring asset completion in {:?}", state.phase);
        return Vec::new();
    }

    for card in &mut state.deck {
        card.face = Face::Revealed;
    }
    let ends_at = now_ms + state.tuning.reveal_ms;
    state.reveal_ends_at = Some(ends_at);
    state.reveal_remaining_ms = state.tuning.reveal_ms;
    state.timers.schedule(ends_at, PairsTimer::RevealEnd);
    state.phase = PairsPhase::Revealing;
    log::info!("Revealing {} cards for {}ms", state.deck.len(), state.tuning.reveal_ms);

    vec![PairsEvent::RevealStarted]
}

/// Player clicked card `index`
pub fn select(state: &mut PairsState, index: usize, now_ms: f64) -> SelectOutcome {
    let reject = |reason: RejectReason| {
        log::debug!("Card {} rejected: {:?}", index, reason);
        SelectOutcome::Rejected(reason)
    };

    if state.phase != PairsPhase::Playing {
        return reject(RejectReason::NotPlaying);
    }
    if state.locked {
        return reject(RejectReason::Locked);
    }
    let Some(card) = state.deck.get_mut(index) else {
        return reject(RejectReason::NoSuchCard);
    };
    if card.matched {
        return reject(RejectReason::AlreadyMatched);
    }
    if card.face == Face::Revealed {
        return reject(RejectReason::AlreadyRevealed);
    }
    card.face = Face::Revealed;
    let character = card.character;

    let Some(first) = state.first_selection.take() else {
        state.first_selection = Some(index);
        return SelectOutcome::First;
    };

    // Second pick: exactly two cards are compared
    state.locked = true;
    if state.deck[first].character == character {
        state.deck[first].matched = true;
        state.deck[index].matched = true;
        state.matched_pairs += 1;
        state.locked = false;
        log::debug!(
            "Matched {} ({}/{})",
            character.key(),
            state.matched_pairs,
            state.total_pairs()
        );
        SelectOutcome::Matched {
            pairs: state.matched_pairs,
        }
    } else {
        let id = state.timers.schedule(
            now_ms + state.tuning.mismatch_delay_ms,
            PairsTimer::FlipBack {
                first,
                second: index,
            },
        );
        state.pending_flip = Some(id);
        SelectOutcome::Mismatched
    }
}

/// Advance the round to host time `now_ms`
pub fn tick(state: &mut PairsState, now_ms: f64) -> Vec<PairsEvent> {
    let mut events = Vec::new();

    for timer in state.timers.pop_due(now_ms) {
        match timer {
            PairsTimer::RevealEnd => end_reveal(state, now_ms, &mut events),
            PairsTimer::FlipBack { first, second } => {
                flip_back(state, first, second, &mut events)
            }
        }
    }

    match state.phase {
        PairsPhase::Revealing => {
            if let Some(ends_at) = state.reveal_ends_at {
                state.reveal_remaining_ms = (ends_at - now_ms).max(0.0);
            }
        }
        PairsPhase::Playing => {
            let started = state.timer_started_at.unwrap_or(now_ms);
            let elapsed = now_ms - started;
            state.remaining_ms = (state.tuning.time_limit_ms - elapsed).max(0.0);

            // Win is checked first: a final match on the deadline frame still wins
            if state.matched_pairs >= state.total_pairs() {
                finish(state, PairsPhase::Won);
                events.push(PairsEvent::Won {
                    remaining_ms: state.remaining_ms,
                });
            } else if state.remaining_ms <= 0.0 {
                finish(state, PairsPhase::TimedOut);
                events.push(PairsEvent::TimedOut {
                    matched_pairs: state.matched_pairs,
                });
            }
        }
        _ => {}
    }

    events
}

fn end_reveal(state: &mut PairsState, now_ms: f64, events: &mut Vec<PairsEvent>) {
    if state.phase != PairsPhase::Revealing {
        return;
    }
    for card in &mut state.deck {
        card.face = Face::Hidden;
    }
    state.reveal_ends_at = None;
    state.reveal_remaining_ms = 0.0;
    state.locked = false;
    state.timer_started_at = Some(now_ms);
    state.remaining_ms = state.tuning.time_limit_ms;
    state.phase = PairsPhase::Playing;
    log::info!("Cards hidden, {}ms on the clock", state.tuning.time_limit_ms);
    events.push(PairsEvent::RevealEnded);
}

fn flip_back(state: &mut PairsState, first: usize, second: usize, events: &mut Vec<PairsEvent>) {
    state.pending_flip = None;
    if state.phase != PairsPhase::Playing {
        return;
    }
    for index in [first, second] {
        if let Some(card) = state.deck.get_mut(index).filter(|c| !c.matched) {
            card.face = Face::Hidden;
        }
    }
    state.locked = false;
    events.push(PairsEvent::CardsHidden { first, second });
}

/// Stop the clock and lock the board
fn finish(state: &mut PairsState, outcome: PairsPhase) {
    // The reveal has already fired, so a flip-back is the only thing left
    if let Some(id) = state.pending_flip.take() {
        if state.timers.cancel(id) {
            log::debug!("Dropped pending flip-back");
        }
    }
    state.first_selection = None;
    state.locked = true;
    state.phase = outcome;

    if outcome == PairsPhase::TimedOut {
        for card in state.deck.iter_mut().filter(|c| !c.matched) {
            card.face = Face::Hidden;
        }
    }
    log::info!(
        "Pairs finished: {:?} with {}/{} pairs, {:.0}ms left",
        outcome,
        state.matched_pairs,
        state.total_pairs(),
        state.remaining_ms
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tuning::PairsTuning;

    /// Index pairs of matching cards, in deck order of first appearance
    fn pairs_of(state: &PairsState) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for (i, a) in state.deck.iter().enumerate() {
            let partner =
                (i + 1..state.deck.len()).find(|&j| state.deck[j].character == a.character);
            if let Some(j) = partner {
                out.push((i, j));
            }
        }
        out
    }

    /// Two cards that do not match
    fn mismatch_of(state: &PairsState) -> (usize, usize) {
        let j = (1..state.deck.len())
            .find(|&j| state.deck[j].character != state.deck[0].character)
            .unwrap();
        (0, j)
    }

    /// Loaded at t=0, reveal over, countdown started
    fn playing(tuning: PairsTuning, seed: u64) -> PairsState {
        let mut state = PairsState::new(tuning, seed);
        assets_loaded(&mut state, 0.0);
        let events = tick(&mut state, tuning.reveal_ms);
        assert_eq!(events, vec![PairsEvent::RevealEnded]);
        state
    }

    #[test]
    fn test_reveal_phase_shows_then_hides() {
        let tuning = PairsTuning::relaxed();
        let mut state = PairsState::new(tuning, 5);
        assert_eq!(select(&mut state, 0, 0.0), SelectOutcome::Rejected(RejectReason::NotPlaying));

        assert_eq!(assets_loaded(&mut state, 100.0), vec![PairsEvent::RevealStarted]);
        assert!(state.deck.iter().all(|c| c.is_revealed()));
        assert!(state.locked);

        tick(&mut state, 1100.0);
        assert_eq!(state.phase, PairsPhase::Revealing);
        assert_eq!(state.reveal_remaining_ms, 2000.0);
        assert_eq!(state.view().timer_label, "Memorize the cards! 2.0s");
        assert_eq!(
            select(&mut state, 0, 1100.0),
            SelectOutcome::Rejected(RejectReason::NotPlaying)
        );

        assert_eq!(tick(&mut state, 3100.0), vec![PairsEvent::RevealEnded]);
        assert_eq!(state.phase, PairsPhase::Playing);
        assert!(!state.locked);
        assert!(state.deck.iter().all(|c| !c.is_revealed()));
        assert_eq!(state.timer_started_at, Some(3100.0));
    }

    #[test]
    fn test_second_assets_loaded_is_ignored() {
        let mut state = playing(PairsTuning::default(), 5);
        assert!(assets_loaded(&mut state, 2000.0).is_empty());
        assert!(state.deck.iter().all(|c| !c.is_revealed()));
    }

    #[test]
    fn test_match_unlocks_immediately() {
        let mut state = playing(PairsTuning::default(), 9);
        let (a, b) = pairs_of(&state)[0];

        assert_eq!(select(&mut state, a, 1100.0), SelectOutcome::First);
        assert_eq!(state.first_selection, Some(a));
        assert_eq!(select(&mut state, b, 1200.0), SelectOutcome::Matched { pairs: 1 });
        assert!(!state.locked);
        assert!(state.first_selection.is_none());
        assert!(state.deck[a].matched && state.deck[b].matched);

        assert_eq!(
            select(&mut state, a, 1300.0),
            SelectOutcome::Rejected(RejectReason::AlreadyMatched)
        );
        let view = state.view();
        assert!(view.cards[a].face_up && view.cards[a].matched);
    }

    #[test]
    fn test_same_card_twice_is_rejected() {
        let mut state = playing(PairsTuning::default(), 9);
        assert_eq!(select(&mut state, 3, 1100.0), SelectOutcome::First);
        assert_eq!(
            select(&mut state, 3, 1150.0),
            SelectOutcome::Rejected(RejectReason::AlreadyRevealed)
        );
        assert_eq!(state.first_selection, Some(3));
        assert_eq!(
            select(&mut state, 99, 1150.0),
            SelectOutcome::Rejected(RejectReason::NoSuchCard)
        );
    }

    #[test]
    fn test_mismatch_locks_until_flip_back() {
        let tuning = PairsTuning::default();
        let mut state = playing(tuning, 11);
        let (a, b) = mismatch_of(&state);
        let (c, _) = pairs_of(&state)
            .into_iter()
            .find(|&(x, y)| x != a && x != b && y != a && y != b)
            .unwrap();

        select(&mut state, a, 1100.0);
        assert_eq!(select(&mut state, b, 1200.0), SelectOutcome::Mismatched);
        assert!(state.locked);
        assert!(state.has_pending_flip());
        assert!(state.first_selection.is_none());
        assert_eq!(select(&mut state, c, 1300.0), SelectOutcome::Rejected(RejectReason::Locked));

        // Still visible just before the delay ends
        assert!(tick(&mut state, 1200.0 + tuning.mismatch_delay_ms - 1.0).is_empty());
        assert!(state.deck[a].is_revealed() && state.deck[b].is_revealed());

        let events = tick(&mut state, 1200.0 + tuning.mismatch_delay_ms);
        assert_eq!(events, vec![PairsEvent::CardsHidden { first: a, second: b }]);
        assert!(!state.locked);
        assert!(!state.deck[a].is_revealed() && !state.deck[b].is_revealed());
        assert_eq!(select(&mut state, c, 1800.0), SelectOutcome::First);
    }

    #[test]
    fn test_restart_during_mismatch_delay_drops_stale_flip() {
        let tuning = PairsTuning::default();
        let mut state = playing(tuning, 13);
        let (a, b) = mismatch_of(&state);
        select(&mut state, a, 1100.0);
        select(&mut state, b, 1200.0);
        assert!(state.has_pending_flip());

        state.restart(14);
        assert!(!state.has_pending_flip());
        assets_loaded(&mut state, 1300.0);

        // The old flip-back would have fired at 1750: new deck must stay revealed and locked
        let events = tick(&mut state, 1800.0);
        assert!(events.is_empty());
        assert_eq!(state.phase, PairsPhase::Revealing);
        assert!(state.locked);
        assert!(state.deck.iter().all(|c| c.is_revealed()));
    }

    #[test]
    fn test_restart_during_reveal_drops_stale_reveal_end() {
        let tuning = PairsTuning::default();
        let mut state = PairsState::new(tuning, 1);
        assets_loaded(&mut state, 0.0);
        state.restart(2);
        assert!(tick(&mut state, 5000.0).is_empty());
        assert_eq!(state.phase, PairsPhase::Loading);
    }

    #[test]
    fn test_all_pairs_in_budget_wins() {
        let tuning = PairsTuning::relaxed();
        let mut state = playing(tuning, 21);
        let start = tuning.reveal_ms;
        let mut now = start;
        for (a, b) in pairs_of(&state) {
            now += 200.0;
            assert_eq!(select(&mut state, a, now), SelectOutcome::First);
            now += 200.0;
            assert!(matches!(select(&mut state, b, now), SelectOutcome::Matched { .. }));
            let events = tick(&mut state, now);
            if state.matched_pairs < 8 {
                assert!(events.is_empty());
            }
        }
        assert_eq!(state.phase, PairsPhase::Won);
        assert!(state.locked);
        assert_eq!(state.remaining_ms, tuning.time_limit_ms - (now - start));
        assert!(state.view().status.is_some_and(|s| s.contains("10 seconds")));
        assert_eq!(select(&mut state, 0, now), SelectOutcome::Rejected(RejectReason::NotPlaying));
    }

    #[test]
    fn test_seven_of_eight_times_out() {
        let tuning = PairsTuning::relaxed();
        let mut state = playing(tuning, 22);
        let pairs = pairs_of(&state);
        let mut now = tuning.reveal_ms;
        for &(a, b) in &pairs[..7] {
            now += 100.0;
            select(&mut state, a, now);
            select(&mut state, b, now);
            tick(&mut state, now);
        }
        assert_eq!(state.matched_pairs, 7);
        assert_eq!(state.phase, PairsPhase::Playing);

        let deadline = tuning.reveal_ms + tuning.time_limit_ms;
        assert!(tick(&mut state, deadline - 1.0).is_empty());
        let events = tick(&mut state, deadline);
        assert_eq!(events, vec![PairsEvent::TimedOut { matched_pairs: 7 }]);
        assert_eq!(state.phase, PairsPhase::TimedOut);
        assert_eq!(state.ratio(), 0.0);
        assert_eq!(state.view().timer_label, "Time's up");
    }

    #[test]
    fn test_win_takes_priority_over_timeout_on_same_tick() {
        let tuning = PairsTuning::relaxed();
        let mut state = playing(tuning, 23);
        let pairs = pairs_of(&state);
        for &(a, b) in &pairs {
            select(&mut state, a, 4000.0);
            select(&mut state, b, 4000.0);
        }
        // First tick after the last match lands well past the deadline
        let events = tick(&mut state, 60_000.0);
        assert_eq!(events, vec![PairsEvent::Won { remaining_ms: 0.0 }]);
        assert_eq!(state.phase, PairsPhase::Won);
    }

    #[test]
    fn test_timeout_cancels_pending_flip() {
        let tuning = PairsTuning::default();
        let mut state = playing(tuning, 24);
        let (a, b) = mismatch_of(&state);
        let deadline = tuning.reveal_ms + tuning.time_limit_ms;
        select(&mut state, a, deadline - 10.0);
        select(&mut state, b, deadline - 10.0);

        tick(&mut state, deadline);
        assert_eq!(state.phase, PairsPhase::TimedOut);
        assert!(!state.has_pending_flip());
        assert!(state.timers.is_empty());

        // The flip-back never unlocks the finished board
        assert!(tick(&mut state, deadline + 1000.0).is_empty());
        assert!(state.locked);
    }
}
