//! Core engine types: configuration, errors, RNG, timers and the clock.
//!
//! These building blocks know nothing about cards. The deck and game
//! modules are built on top of them.

pub mod clock;
pub mod config;
pub mod error;
pub mod rng;
pub mod timer;

pub use clock::{Clock, Elapsed, InvalidElapsed};
pub use config::{Difficulty, GameConfig, DEFAULT_REVERT_DELAY_MS, DEFAULT_TICK_INTERVAL_MS};
pub use error::GameError;
pub use rng::{GameRng, GameRngState, ShuffleMode};
pub use timer::{TimerId, TimerQueue};
