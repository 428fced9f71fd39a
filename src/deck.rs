//! The shared 60-card resource deck.
//!
//! Cards move between the draw pile, the discard pile and player hands; the
//! union of the three always equals the fixed composition built by
//! [`standard_cards`].

use crate::battle::state::TurnRng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    Heal,
    Revive,
    Shield,
    Boost,
    Draw,
    Evolve,
    Reinforcements,
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub name: String,
    pub description: String,
    pub kind: CardKind,
    /// Effect magnitude: a fraction of max HP for heals and revives,
    /// a turn count for boosts, a card count for draws.
    pub value: f64,
}

impl Card {
    fn new(id: String, name: &str, description: &str, kind: CardKind, value: f64) -> Self {
        Self {
            id,
            name: name.to_string(),
            description: description.to_string(),
            kind,
            value,
        }
    }
}

/// (count, id prefix, name, description, kind, value)
const COMPOSITION: [(usize, &str, &str, &str, CardKind, f64); 7] = [
    (12, "heal_small", "Small Heal", "Restore 30% HP", CardKind::Heal, 0.3),
    (6, "heal_big", "Big Heal", "Restore 60% HP", CardKind::Heal, 0.6),
    (6, "revive", "Revive", "Revive a fainted Pokemon with 50% HP", CardKind::Revive, 0.5),
    (10, "shield", "Shield", "Reduce next damage by 50%", CardKind::Shield, 0.5),
    (8, "boost", "Boost", "Boost Attack for 2 turns", CardKind::Boost, 2.0),
    (8, "draw", "Draw", "Draw one extra card", CardKind::Draw, 1.0),
    (10, "evolve", "Evolve", "Evolve a Pokemon to its next form", CardKind::Evolve, 0.0),
];

pub const DECK_SIZE: usize = 60;

/// The fixed 60-card composition, unshuffled.
pub fn standard_cards() -> Vec<Card> {
    let mut cards = Vec::with_capacity(DECK_SIZE);
    for (count, prefix, name, description, kind, value) in COMPOSITION {
        for i in 0..count {
            cards.push(Card::new(format!("{}_{}", prefix, i), name, description, kind, value));
        }
    }
    cards
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    cards: VecDeque<Card>,
    discard: Vec<Card>,
}

impl Deck {
    /// Build the standard deck and shuffle it once.
    pub fn new(rng: &mut TurnRng) -> Self {
        let mut cards = standard_cards();
        rng.shuffle(&mut cards, "Deck Shuffle");
        Self::from_cards(cards)
    }

    /// Build a deck whose draw pile is exactly `cards`, in order.
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self {
            cards: cards.into(),
            discard: Vec::new(),
        }
    }

    /// Draw up to `count` cards from the front of the draw pile.
    ///
    /// An exhausted draw pile is refilled from the shuffled discard pile. When
    /// both are empty the draw stops short.
    pub fn draw(&mut self, count: usize, rng: &mut TurnRng) -> Vec<Card> {
        let mut drawn = Vec::with_capacity(count);
        for _ in 0..count {
            if self.cards.is_empty() {
                self.reshuffle_discard(rng);
            }
            match self.cards.pop_front() {
                Some(card) => drawn.push(card),
                None => break,
            }
        }
        if drawn.len() < count {
            log::debug!("Deck exhausted: drew {} of {} requested cards", drawn.len(), count);
        }
        drawn
    }

    fn reshuffle_discard(&mut self, rng: &mut TurnRng) {
        if self.discard.is_empty() {
            return;
        }
        let mut refill = std::mem::take(&mut self.discard);
        rng.shuffle(&mut refill, "Discard Reshuffle");
        log::debug!("Reshuffled {} discarded cards into the draw pile", refill.len());
        self.cards.extend(refill);
    }

    pub fn discard(&mut self, card: Card) {
        self.discard.push(card);
    }

    pub fn draw_pile(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn discard_pile(&self) -> &[Card] {
        &self.discard
    }

    pub fn draw_pile_len(&self) -> usize {
        self.cards.len()
    }

    pub fn discard_len(&self) -> usize {
        self.discard.len()
    }

    pub fn total_cards(&self) -> usize {
        self.cards.len() + self.discard.len()
    }
}

/// Count cards by id prefix, for composition checks across piles and hands.
pub fn composition<'a>(cards: impl IntoIterator<Item = &'a Card>) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for card in cards {
        let prefix = card
            .id
            .rsplit_once('_')
            .map(|(prefix, _)| prefix.to_string())
            .unwrap_or_else(|| card.id.clone());
        *counts.entry(prefix).or_insert(0) += 1;
    }
    counts
}
