//! Cards and deck construction

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// A face that appears on exactly two cards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Character {
    /// Asset key, also used in card ids
    pub key: &'static str,
    /// Display name for labels
    pub label: &'static str,
}

pub const CHARACTERS: [Character; 8] = [
    Character { key: "nahyun", label: "Nahyun" },
    Character { key: "chulho", label: "Kim Chulho" },
    Character { key: "jihye", label: "Seol Jihye" },
    Character { key: "suji", label: "Kim Suji" },
    Character { key: "rokjeong", label: "Jeong Rokjeong" },
    Character { key: "guhee", label: "Han Guhee" },
    Character { key: "yonsoo", label: "Park Yonsoo" },
    Character { key: "kabmin", label: "Kim Kabmin" },
];

/// Image shown on every face-down card
pub const CARD_BACK_URL: &str = "/cards/back.png";

/// Index into `CHARACTERS`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterId(pub u8);

impl CharacterId {
    pub fn character(self) -> &'static Character {
        &CHARACTERS[self.0 as usize % CHARACTERS.len()]
    }

    pub fn key(self) -> &'static str {
        self.character().key
    }

    pub fn label(self) -> &'static str {
        self.character().label
    }

    pub fn front_url(self) -> String {
        format!("/cards/{}.png", self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Face {
    #[default]
    Hidden,
    Revealed,
}

/// A card on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// `<key>_a` or `<key>_b`
    pub id: String,
    pub character: CharacterId,
    pub face: Face,
    /// Matched cards stay face-up and are disabled for the rest of the game
    pub matched: bool,
}

impl Card {
    fn new(character: CharacterId, suffix: char) -> Self {
        Self {
            id: format!("{}_{}", character.key(), suffix),
            character,
            face: Face::Hidden,
            matched: false,
        }
    }

    pub fn is_revealed(&self) -> bool {
        self.face == Face::Revealed
    }

    pub fn aria_label(&self) -> String {
        format!("{} card", self.character.label())
    }
}

/// Two cards per character, uniformly shuffled
pub fn build_deck<R: Rng + ?Sized>(rng: &mut R) -> Vec<Card> {
    let mut deck: Vec<Card> = (0..CHARACTERS.len() as u8)
        .map(CharacterId)
        .flat_map(|c| [Card::new(c, 'a'), Card::new(c, 'b')])
        .collect();
    deck.shuffle(rng);
    deck
}

/// Every image the board needs: one front per character plus the shared back
pub fn asset_urls() -> Vec<String> {
    (0..CHARACTERS.len() as u8)
        .map(|i| CharacterId(i).front_url())
        .chain(std::iter::once(CARD_BACK_URL.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::HashMap;

    #[test]
    fn test_each_character_twice() {
        let mut rng = Pcg32::seed_from_u64(7);
        let deck = build_deck(&mut rng);
        assert_eq!(deck.len(), 16);

        let mut counts: HashMap<CharacterId, usize> = HashMap::new();
        for card in &deck {
            *counts.entry(card.character).or_default() += 1;
            assert_eq!(card.face, Face::Hidden);
            assert!(!card.matched);
        }
        assert_eq!(counts.len(), 8);
        assert!(counts.values().all(|&n| n == 2));
    }

    #[test]
    fn test_card_ids_unique() {
        let mut rng = Pcg32::seed_from_u64(7);
        let deck = build_deck(&mut rng);
        let mut ids: Vec<_> = deck.iter().map(|c| c.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 16);
        assert!(deck.iter().any(|c| c.id == "guhee_b"));
    }

    #[test]
    fn test_shuffle_is_seeded() {
        let a = build_deck(&mut Pcg32::seed_from_u64(42));
        let b = build_deck(&mut Pcg32::seed_from_u64(42));
        let c = build_deck(&mut Pcg32::seed_from_u64(43));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_asset_urls() {
        let urls = asset_urls();
        assert_eq!(urls.len(), 9);
        assert_eq!(urls[0], "/cards/nahyun.png");
        assert_eq!(urls.last().map(String::as_str), Some(CARD_BACK_URL));
    }

    #[test]
    fn test_aria_label() {
        let card = Card::new(CharacterId(1), 'a');
        assert_eq!(card.aria_label(), "Kim Chulho card");
        assert_eq!(card.id, "chulho_a");
    }
}
