//! Deck building: difficulty to a shuffled, face-down board.

mod board;

pub use board::{build_deck, Board};
