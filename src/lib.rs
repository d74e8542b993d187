//! # memory-match
//!
//! A host-agnostic engine for a memory-matching card game.
//!
//! ## Design Principles
//!
//! 1. **Host Drives Everything**: The engine never sleeps or spawns. Input
//!    arrives through `handle_flip`, time through `advance(ms)`.
//!
//! 2. **Events Out**: Every operation returns the `GameEvent`s the host
//!    should render, in order. Rejected input returns nothing.
//!
//! 3. **Deterministic**: Boards come from a seeded ChaCha8 RNG. The same
//!    seed and the same inputs give the same event stream.
//!
//! ## Modules
//!
//! - `core`: difficulty, configuration, errors, RNG, timers, clock
//! - `cards`: the 52 card identities and board cards
//! - `deck`: dealing boards
//! - `records`: best-record stores
//! - `game`: the state machine, the engine and snapshots

pub mod cards;
pub mod core;
pub mod deck;
pub mod game;
pub mod records;

// Re-export commonly used types
pub use crate::core::{
    Clock, Difficulty, Elapsed, GameConfig, GameError, GameRng, GameRngState, InvalidElapsed, ShuffleMode, TimerId,
    TimerQueue,
};

pub use crate::cards::{Card, CardFace, CardIdentity, CardRef, CopyIndex, Rank, Suit, CATALOG};

pub use crate::deck::{build_deck, Board};

pub use crate::records::{BestRecord, JsonFileStore, MemoryStore, RecordStore, StoreError};

pub use crate::game::{CardView, GameEvent, GameOutcome, GameSession, GameSnapshot, MemoryGame};
