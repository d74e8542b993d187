//! Events emitted to the host's render surface.
//!
//! Every operation returns the events it produced, in order. A host that
//! applies them in sequence stays in sync with the engine without reading
//! its state. Rejected input produces no events.

use serde::{Deserialize, Serialize};

use crate::cards::{CardFace, CardRef};
use crate::core::{Difficulty, Elapsed};
use crate::records::BestRecord;

/// A card as laid out when the board is dealt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    pub card: CardRef,
    pub face: CardFace,
}

/// Final result of a completed game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub difficulty: Difficulty,
    pub moves: u32,
    pub elapsed: Elapsed,
    /// `moves` replaced the stored best score.
    pub new_best_score: bool,
    /// `elapsed` replaced the stored best time.
    pub new_best_time: bool,
    /// Records as they were before this game.
    pub previous: BestRecord,
}

impl GameOutcome {
    /// True if either record improved.
    #[must_use]
    pub fn is_new_record(&self) -> bool {
        self.new_best_score || self.new_best_time
    }
}

/// Something the host should render.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A new board, in layout order, all face-down.
    BoardDealt {
        difficulty: Difficulty,
        cards: Vec<CardView>,
    },

    /// A card turned over.
    CardTurned { card: CardRef, face: CardFace },

    /// The move counter changed. `new_record` is true while the count is at
    /// or under the stored best (or no best exists); advisory only.
    MovesChanged { moves: u32, new_record: bool },

    /// The clock changed. `new_record` as for `MovesChanged`.
    TimeChanged { elapsed: Elapsed, new_record: bool },

    /// Two face-up cards share an identity and stay revealed.
    PairMatched { first: CardRef, second: CardRef },

    /// Two face-up cards differ; they flip back after the revert delay.
    PairMissed { first: CardRef, second: CardRef },

    /// Best records to display for a difficulty.
    BestRecordShown {
        difficulty: Difficulty,
        record: BestRecord,
    },

    /// Every pair was found, or the game was ended explicitly.
    GameFinished(GameOutcome),

    /// The game was dropped without touching records.
    GameAbandoned { difficulty: Difficulty },

    /// The clock stopped and input is ignored until resumed.
    Paused,

    /// Play continues.
    Resumed,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardIdentity, Rank, Suit};

    #[test]
    fn test_outcome_new_record() {
        let mut outcome = GameOutcome {
            difficulty: Difficulty::Easy,
            moves: 10,
            elapsed: Elapsed::new(0, 12, 0),
            new_best_score: false,
            new_best_time: false,
            previous: BestRecord::default(),
        };
        assert!(!outcome.is_new_record());

        outcome.new_best_time = true;
        assert!(outcome.is_new_record());
    }

    #[test]
    fn test_event_serialization() {
        let event = GameEvent::CardTurned {
            card: CardRef::new(3),
            face: CardFace::Up(CardIdentity::new(Rank::Jack, Suit::Spades)),
        };

        let json = serde_json::to_string(&event).unwrap();
        let back: GameEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }
}
