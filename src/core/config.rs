//! Game configuration types.
//!
//! - `Difficulty`: board size selection (easy, medium, hard)
//! - `GameConfig`: timing, shuffle algorithm and seeding
//!
//! `GameConfig` is built in code with builder methods, or loaded from a
//! JSON document where every field is optional.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::GameError;
use super::rng::ShuffleMode;

/// Board size selection.
///
/// The lowercase name doubles as the record store key prefix.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// All difficulties, smallest board first.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Number of distinct identities dealt (each appears twice).
    #[must_use]
    pub const fn pair_count(self) -> usize {
        match self {
            Difficulty::Easy => 5,
            Difficulty::Medium => 10,
            Difficulty::Hard => 20,
        }
    }

    /// Number of cards on the board.
    #[must_use]
    pub const fn board_len(self) -> usize {
        self.pair_count() * 2
    }

    /// Lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(GameError::InvalidDifficulty(s.to_string())),
        }
    }
}

/// Default delay before a mismatched pair flips back.
pub const DEFAULT_REVERT_DELAY_MS: u64 = 1000;

/// Default clock resolution (one hundredth of a second).
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 10;

/// Complete game configuration.
///
/// ## Example
///
/// ```
/// use memory_match::core::{GameConfig, ShuffleMode};
///
/// let config = GameConfig::new()
///     .with_revert_delay_ms(500)
///     .with_shuffle(ShuffleMode::Sattolo)
///     .with_seed(7);
///
/// assert_eq!(config.revert_delay_ms, 500);
/// assert_eq!(config.seed, Some(7));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// How long a mismatched pair stays face-up before reverting.
    pub revert_delay_ms: u64,

    /// Interval between clock ticks. Each tick adds one hundredth of a
    /// second to the elapsed time, whatever this interval is.
    pub tick_interval_ms: u64,

    /// Shuffle algorithm used for both the catalog draw and the board.
    pub shuffle: ShuffleMode,

    /// Fixed RNG seed. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            revert_delay_ms: DEFAULT_REVERT_DELAY_MS,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            shuffle: ShuffleMode::default(),
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a configuration with the default timings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON configuration. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.tick_interval_ms == 0 {
            return Err(GameError::InvalidConfig("tick_interval_ms must be positive"));
        }
        Ok(())
    }

    /// Set the mismatch revert delay.
    #[must_use]
    pub fn with_revert_delay_ms(mut self, delay: u64) -> Self {
        self.revert_delay_ms = delay;
        self
    }

    /// Set the clock tick interval.
    #[must_use]
    pub fn with_tick_interval_ms(mut self, interval: u64) -> Self {
        self.tick_interval_ms = interval;
        self
    }

    /// Set the shuffle algorithm.
    #[must_use]
    pub fn with_shuffle(mut self, mode: ShuffleMode) -> Self {
        self.shuffle = mode;
        self
    }

    /// Fix the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
