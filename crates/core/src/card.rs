use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{GameError, Result};

pub const RANK_COUNT: u8 = 13;
pub const SUIT_COUNT: u8 = 4;
/// Number of distinct cards in a standard deck (no jokers)
pub const DECK_SIZE: usize = (RANK_COUNT as usize) * (SUIT_COUNT as usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    rank: u8, // 1..=13 (Ace = 1)
    suit: u8, // 0..=3
}

impl Card {
    /// Create a card; `rank` in 1..=13, `suit` in 0..=3.
    ///
    /// # Panics
    /// On an out-of-range rank or suit. See [`Card::try_new`].
    pub fn new(rank: u8, suit: u8) -> Self {
        assert!((1..=RANK_COUNT).contains(&rank), "rank out of range: {rank}");
        assert!(suit < SUIT_COUNT, "suit out of range: {suit}");
        Self { rank, suit }
    }

    pub fn try_new(rank: u8, suit: u8) -> Result<Self> {
        if !(1..=RANK_COUNT).contains(&rank) || suit >= SUIT_COUNT {
            return Err(GameError::InvalidCard { rank, suit });
        }
        Ok(Self { rank, suit })
    }

    pub fn rank(&self) -> u8 {
        self.rank
    }

    pub fn suit(&self) -> u8 {
        self.suit
    }

    /// Unique index in `0..DECK_SIZE`
    pub fn index(&self) -> usize {
        self.suit as usize * RANK_COUNT as usize + (self.rank as usize - 1)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rank = match self.rank {
            1 => "A".to_string(),
            11 => "J".to_string(),
            12 => "Q".to_string(),
            13 => "K".to_string(),
            r => r.to_string(),
        };
        let suit = ['S', 'H', 'D', 'C'][self.suit as usize];
        write!(f, "{rank}{suit}")
    }
}

/// Draw pile. Dealing pops from the top; nothing is ever put back.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Full 52-card deck in suit-major order
    pub fn standard() -> Self {
        let cards = (0..SUIT_COUNT)
            .flat_map(|suit| (1..=RANK_COUNT).map(move |rank| Card::new(rank, suit)))
            .collect();
        Self { cards }
    }

    /// Full deck, shuffled with the given RNG
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::standard();
        deck.shuffle(rng);
        deck
    }

    /// Deck that deals `cards` in the given order (first element dealt first)
    pub fn from_cards(mut cards: Vec<Card>) -> Self {
        cards.reverse();
        Self { cards }
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    pub fn deal(&mut self) -> Result<Card> {
        self.cards.pop().ok_or(GameError::EmptyDeck)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Sum of card ranks
    pub fn score(&self) -> u32 {
        self.cards.iter().map(|c| c.rank() as u32).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cards: Vec<String> = self.cards.iter().map(ToString::to_string).collect();
        write!(f, "[{}]", cards.join(" "))
    }
}
