//! The stack of pending (face-up, unresolved) cards.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::CardRef;

/// At most two pending cards. Emptied after every resolution.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlipStack {
    cards: SmallVec<[CardRef; 2]>,
}

impl FlipStack {
    /// Maximum number of pending cards.
    pub const CAPACITY: usize = 2;

    /// Create an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a card. Returns false, leaving the stack unchanged, when full.
    pub fn push(&mut self, card: CardRef) -> bool {
        if self.cards.len() >= Self::CAPACITY {
            return false;
        }
        self.cards.push(card);
        true
    }

    /// Most recently flipped pending card.
    #[must_use]
    pub fn top(&self) -> Option<CardRef> {
        self.cards.last().copied()
    }

    /// Remove the most recent card.
    pub fn pop(&mut self) -> Option<CardRef> {
        self.cards.pop()
    }

    /// Drop every pending card.
    pub fn clear(&mut self) {
        self.cards.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Pending cards, oldest first.
    #[must_use]
    pub fn as_slice(&self) -> &[CardRef] {
        &self.cards
    }
}
