//! Scheduled events with cancellation
//!
//! Delayed transitions (reveal end, mismatch flip-back) are queued here
//! instead of living in host callbacks. Every id carries the generation it was
//! scheduled in; `cancel_all` bumps the generation so nothing scheduled before
//! a restart can fire afterwards.

use serde::{Deserialize, Serialize};

/// Handle to a scheduled event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerId {
    generation: u64,
    seq: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Pending<E> {
    id: TimerId,
    due_ms: f64,
    event: E,
}

/// Queue of events due at host timestamps (ms)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timers<E> {
    generation: u64,
    next_seq: u64,
    pending: Vec<Pending<E>>,
}

impl<E> Default for Timers<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Timers<E> {
    pub fn new() -> Self {
        Self {
            generation: 0,
            next_seq: 0,
            pending: Vec::new(),
        }
    }

    /// Schedule `event` to fire once `now_ms >= due_ms`
    pub fn schedule(&mut self, due_ms: f64, event: E) -> TimerId {
        let id = TimerId {
            generation: self.generation,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.pending.push(Pending { id, due_ms, event });
        id
    }

    /// Cancel a single event. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    /// Drop every pending event and invalidate all outstanding ids
    pub fn cancel_all(&mut self) {
        if !self.pending.is_empty() {
            log::debug!("Cancelling {} pending timer(s)", self.pending.len());
        }
        self.pending.clear();
        self.generation += 1;
    }

    /// Whether `id` was scheduled in the current generation and has not fired
    pub fn is_live(&self, id: TimerId) -> bool {
        id.generation == self.generation && self.pending.iter().any(|p| p.id == id)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return every event due at `now_ms`, earliest first
    /// (ties in scheduling order)
    pub fn pop_due(&mut self, now_ms: f64) -> Vec<E> {
        let (mut due, rest): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|p| p.due_ms <= now_ms);
        self.pending = rest;
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.id.seq.cmp(&b.id.seq)));
        due.into_iter().map(|p| p.event).collect()
    }
}
