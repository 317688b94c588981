//! Best score for the rope game
//!
//! A single integer persisted to LocalStorage. Anything unreadable counts as
//! no score yet.

use serde::{Deserialize, Serialize};

use crate::platform::KeyValueStore;

/// Highest rope score so far
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BestScore {
    pub value: u32,
}

impl BestScore {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "ppm_jump_best";

    pub fn new(value: u32) -> Self {
        Self { value }
    }

    /// Parse a stored value; missing, malformed or negative values read as 0
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };
        match serde_json::from_str::<BestScore>(raw.trim()) {
            Ok(best) => best,
            Err(e) => {
                log::warn!("Ignoring stored best score {:?}: {}", raw, e);
                Self::default()
            }
        }
    }

    /// Returns true if `score` beats the current best (and records it)
    pub fn record(&mut self, score: u32) -> bool {
        if score > self.value {
            self.value = score;
            true
        } else {
            false
        }
    }

    pub fn load(store: &impl KeyValueStore) -> Self {
        let best = Self::parse(store.get_item(Self::STORAGE_KEY).as_deref());
        log::info!("Best score: {}", best.value);
        best
    }

    pub fn save(&self, store: &mut impl KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(json) => {
                if store.set_item(Self::STORAGE_KEY, &json) {
                    log::info!("Best score saved ({})", self.value);
                } else {
                    log::warn!("Could not save best score");
                }
            }
            Err(e) => log::warn!("Could not encode best score: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStore;

    #[test]
    fn test_parse_plain_number() {
        assert_eq!(BestScore::parse(Some("12")).value, 12);
        assert_eq!(BestScore::parse(Some(" 7\n")).value, 7);
    }

    #[test]
    fn test_parse_garbage_is_zero() {
        assert_eq!(BestScore::parse(None).value, 0);
        assert_eq!(BestScore::parse(Some("")).value, 0);
        assert_eq!(BestScore::parse(Some("abc")).value, 0);
        assert_eq!(BestScore::parse(Some("-3")).value, 0);
        assert_eq!(BestScore::parse(Some("4.5")).value, 0);
        assert_eq!(BestScore::parse(Some("99999999999")).value, 0);
    }

    #[test]
    fn test_record_only_on_improvement() {
        let mut best = BestScore::new(5);
        assert!(!best.record(5));
        assert!(!best.record(3));
        assert!(best.record(6));
        assert_eq!(best.value, 6);
    }

    #[test]
    fn test_save_and_load() {
        let mut store = MemoryStore::new();
        assert_eq!(BestScore::load(&store).value, 0);

        BestScore::new(42).save(&mut store);
        assert_eq!(store.get_item(BestScore::STORAGE_KEY).as_deref(), Some("42"));
        assert_eq!(BestScore::load(&store).value, 42);
    }

    #[test]
    fn test_load_corrupt_value() {
        let mut store = MemoryStore::new();
        store.set_item(BestScore::STORAGE_KEY, "{not json");
        assert_eq!(BestScore::load(&store), BestScore::default());
    }
}
