//! Card identities and board cards.
//!
//! - `identity`: the 52 rank/suit identities and their keys
//! - `instance`: physical cards, references and faces

pub mod identity;
pub mod instance;

pub use identity::{CardIdentity, Rank, Suit, UnknownCardKey, CATALOG};
pub use instance::{Card, CardFace, CardRef, CopyIndex};
