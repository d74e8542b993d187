//! Card identities - the fixed 52-card catalog.
//!
//! A `CardIdentity` is the logical value of a card (rank and suit). Two
//! physical cards on the board share each identity. Identities are compared
//! directly; they are never recovered from a presentation key.
//!
//! Each identity has a stable key such as `aceClubs` or `tenHearts`, which
//! hosts use to look up card art.
//!
//! ```
//! use memory_match::cards::{CardIdentity, Rank, Suit, CATALOG};
//!
//! assert_eq!(CATALOG.len(), 52);
//! assert_eq!(CATALOG[0].key(), "aceClubs");
//!
//! let queen: CardIdentity = "queenHearts".parse().unwrap();
//! assert_eq!(queen, CardIdentity::new(Rank::Queen, Suit::Hearts));
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Card rank, ace low.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    Ace,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

impl Rank {
    /// All ranks in catalog order.
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Lowercase word used in identity keys.
    #[must_use]
    pub const fn word(self) -> &'static str {
        match self {
            Rank::Ace => "ace",
            Rank::Two => "two",
            Rank::Three => "three",
            Rank::Four => "four",
            Rank::Five => "five",
            Rank::Six => "six",
            Rank::Seven => "seven",
            Rank::Eight => "eight",
            Rank::Nine => "nine",
            Rank::Ten => "ten",
            Rank::Jack => "jack",
            Rank::Queen => "queen",
            Rank::King => "king",
        }
    }
}

/// Card suit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Suit {
    Clubs,
    Spades,
    Diamonds,
    Hearts,
}

impl Suit {
    /// All suits in catalog order.
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Spades, Suit::Diamonds, Suit::Hearts];

    /// Capitalized word used in identity keys.
    #[must_use]
    pub const fn word(self) -> &'static str {
        match self {
            Suit::Clubs => "Clubs",
            Suit::Spades => "Spades",
            Suit::Diamonds => "Diamonds",
            Suit::Hearts => "Hearts",
        }
    }
}

/// The logical value of a card, shared by its two copies on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardIdentity {
    pub rank: Rank,
    pub suit: Suit,
}

impl CardIdentity {
    /// Create an identity.
    #[must_use]
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// Stable key, e.g. `sevenDiamonds`.
    #[must_use]
    pub fn key(self) -> String {
        format!("{}{}", self.rank.word(), self.suit.word())
    }

    /// Position in `CATALOG`.
    #[must_use]
    pub const fn index(self) -> usize {
        self.rank as usize * 4 + self.suit as usize
    }
}

impl std::fmt::Display for CardIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.rank.word(), self.suit.word())
    }
}

/// Error returned when a key names no card.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown card key '{0}'")]
pub struct UnknownCardKey(pub String);

impl FromStr for CardIdentity {
    type Err = UnknownCardKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        for rank in Rank::ALL {
            let Some(rest) = s.strip_prefix(rank.word()) else {
                continue;
            };
            if let Some(suit) = Suit::ALL.into_iter().find(|suit| suit.word() == rest) {
                return Ok(CardIdentity::new(rank, suit));
            }
        }
        Err(UnknownCardKey(s.to_string()))
    }
}

const fn build_catalog() -> [CardIdentity; 52] {
    let mut cards = [CardIdentity::new(Rank::Ace, Suit::Clubs); 52];
    let mut r = 0;
    while r < 13 {
        let mut s = 0;
        while s < 4 {
            cards[r * 4 + s] = CardIdentity::new(Rank::ALL[r], Suit::ALL[s]);
            s += 1;
        }
        r += 1;
    }
    cards
}

/// Every identity, rank-major: ace of clubs, ace of spades, ... king of hearts.
pub const CATALOG: [CardIdentity; 52] = build_catalog();
