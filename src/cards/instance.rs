//! Card instances - physical cards on the board.
//!
//! A `Card` is one of the two copies of an identity placed on the board.
//! `CardRef` names a card by its board position and is what input events
//! carry.

use serde::{Deserialize, Serialize};

use super::identity::CardIdentity;

/// Reference to a physical card: its position on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardRef(pub u32);

impl CardRef {
    /// Create a reference to board position `index`.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Board position.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for CardRef {
    fn from(index: u32) -> Self {
        Self(index)
    }
}

impl std::fmt::Display for CardRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card#{}", self.0)
    }
}

/// Which of the two copies of an identity a card is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CopyIndex {
    First,
    Second,
}

impl CopyIndex {
    /// 0 for the first copy, 1 for the second.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            CopyIndex::First => 0,
            CopyIndex::Second => 1,
        }
    }
}

/// What the host should show for a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardFace {
    /// Card back.
    Down,
    /// Card front.
    Up(CardIdentity),
}

impl CardFace {
    /// Image key: `cardBack`, or the identity key such as `aceClubs`.
    #[must_use]
    pub fn image_key(self) -> String {
        match self {
            CardFace::Down => "cardBack".to_string(),
            CardFace::Up(identity) => identity.key(),
        }
    }

    /// True for `Up`.
    #[must_use]
    pub fn is_up(self) -> bool {
        matches!(self, CardFace::Up(_))
    }
}

/// A card on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    /// Board position.
    pub card_ref: CardRef,

    /// Logical value, shared with exactly one other card.
    pub identity: CardIdentity,

    /// Disambiguates the two copies of `identity`.
    pub copy: CopyIndex,

    /// Is the front showing?
    pub face_up: bool,

    /// Has this card been paired? Matched cards stay face-up for the rest
    /// of the game and ignore input.
    pub matched: bool,
}

impl Card {
    /// Create a face-down, unmatched card.
    #[must_use]
    pub fn new(card_ref: CardRef, identity: CardIdentity, copy: CopyIndex) -> Self {
        Self {
            card_ref,
            identity,
            copy,
            face_up: false,
            matched: false,
        }
    }

    /// What the host should currently show.
    #[must_use]
    pub fn face(&self) -> CardFace {
        if self.face_up {
            CardFace::Up(self.identity)
        } else {
            CardFace::Down
        }
    }

    /// True if this card and `other` are the two copies of one identity.
    #[must_use]
    pub fn pairs_with(&self, other: &Card) -> bool {
        self.card_ref != other.card_ref && self.identity == other.identity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Rank, Suit};

    fn ace_of_clubs() -> CardIdentity {
        CardIdentity::new(Rank::Ace, Suit::Clubs)
    }

    #[test]
    fn test_new_card_is_face_down() {
        let card = Card::new(CardRef::new(3), ace_of_clubs(), CopyIndex::First);

        assert!(!card.face_up);
        assert!(!card.matched);
        assert_eq!(card.face(), CardFace::Down);
        assert_eq!(card.face().image_key(), "cardBack");
    }

    #[test]
    fn test_face_up_shows_identity() {
        let mut card = Card::new(CardRef::new(0), ace_of_clubs(), CopyIndex::Second);
        card.face_up = true;

        assert_eq!(card.face(), CardFace::Up(ace_of_clubs()));
        assert_eq!(card.face().image_key(), "aceClubs");
        assert!(card.face().is_up());
    }

    #[test]
    fn test_pairs_with() {
        let a = Card::new(CardRef::new(0), ace_of_clubs(), CopyIndex::First);
        let b = Card::new(CardRef::new(5), ace_of_clubs(), CopyIndex::Second);
        let c = Card::new(CardRef::new(6), CardIdentity::new(Rank::Two, Suit::Clubs), CopyIndex::First);

        assert!(a.pairs_with(&b));
        assert!(!a.pairs_with(&a));
        assert!(!a.pairs_with(&c));
    }

    #[test]
    fn test_copy_index() {
        assert_eq!(CopyIndex::First.as_u8(), 0);
        assert_eq!(CopyIndex::Second.as_u8(), 1);
    }

    #[test]
    fn test_card_ref_display() {
        assert_eq!(CardRef::new(7).to_string(), "Card#7");
        assert_eq!(CardRef::from(4).index(), 4);
    }
}
