//! Board construction and lookup.
//!
//! Dealing draws `pair_count` identities from a shuffled copy of the
//! catalog, lays each one down twice, then shuffles the whole board.
//! Card references are assigned from the final positions.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardIdentity, CardRef, CopyIndex, CATALOG};
use crate::core::{Difficulty, GameError, GameRng, ShuffleMode};

/// Ordered cards of one game.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cards: Vec<Card>,
}

impl Board {
    /// Deal a fresh face-down board for `difficulty`.
    #[must_use]
    pub fn deal(difficulty: Difficulty, rng: &mut GameRng, mode: ShuffleMode) -> Self {
        let pairs = difficulty.pair_count();

        let mut catalog = CATALOG;
        rng.shuffle(&mut catalog, mode);
        let chosen = &catalog[..pairs];

        let mut layout: Vec<(CardIdentity, CopyIndex)> = chosen
            .iter()
            .map(|&identity| (identity, CopyIndex::First))
            .chain(chosen.iter().map(|&identity| (identity, CopyIndex::Second)))
            .collect();
        rng.shuffle(&mut layout, mode);

        let cards = layout
            .into_iter()
            .enumerate()
            .map(|(position, (identity, copy))| Card::new(CardRef::new(position as u32), identity, copy))
            .collect();

        Self { cards }
    }

    /// Build a board from cards laid out in order. Used by tests and
    /// snapshot tooling; does not validate.
    #[must_use]
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// Number of cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// True for the empty board shown before the first game.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Look up a card.
    #[must_use]
    pub fn get(&self, card: CardRef) -> Option<&Card> {
        self.cards.get(card.index())
    }

    /// Look up a card mutably.
    pub fn get_mut(&mut self, card: CardRef) -> Option<&mut Card> {
        self.cards.get_mut(card.index())
    }

    /// Cards in board order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Cards in board order, as a slice.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Number of matched cards.
    #[must_use]
    pub fn matched_count(&self) -> usize {
        self.cards.iter().filter(|c| c.matched).count()
    }

    /// True once every card is matched.
    #[must_use]
    pub fn is_cleared(&self) -> bool {
        !self.cards.is_empty() && self.cards.iter().all(|c| c.matched)
    }

    /// The card sharing `card`'s identity.
    #[must_use]
    pub fn partner_of(&self, card: CardRef) -> Option<CardRef> {
        let this = self.get(card)?;
        self.cards
            .iter()
            .find(|other| this.pairs_with(other))
            .map(|other| other.card_ref)
    }

    /// Check the board invariants: every position holds its own ref and
    /// every identity appears exactly twice, once per copy index.
    #[must_use]
    pub fn validate(&self) -> bool {
        let mut copies: FxHashMap<CardIdentity, [bool; 2]> = FxHashMap::default();

        for (position, card) in self.cards.iter().enumerate() {
            if card.card_ref.index() != position {
                return false;
            }
            let seen = copies.entry(card.identity).or_default();
            let slot = &mut seen[card.copy.as_u8() as usize];
            if *slot {
                return false;
            }
            *slot = true;
        }

        copies.values().all(|seen| seen[0] && seen[1])
    }
}

/// Deal a board for a difficulty given by name.
///
/// Fails with `InvalidDifficulty` for anything but easy, medium or hard.
pub fn build_deck(difficulty: &str, rng: &mut GameRng, mode: ShuffleMode) -> Result<Board, GameError> {
    let difficulty: Difficulty = difficulty.parse()?;
    Ok(Board::deal(difficulty, rng, mode))
}
