//! Best-record store interface and the in-memory implementation.
//!
//! Records are kept per difficulty under two string keys, `{difficulty}Score`
//! and `{difficulty}Time`, holding the move count and the elapsed triple as
//! JSON text (`"8"`, `"[0,5,30]"`). Any key-value backend with string values
//! can hold them.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::{Difficulty, Elapsed};

/// Best results for one difficulty.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestRecord {
    /// Fewest moves.
    pub best_score: Option<u32>,
    /// Shortest elapsed time.
    pub best_time: Option<Elapsed>,
}

impl BestRecord {
    /// True while `moves` is still on pace for a record (ties count).
    #[must_use]
    pub fn moves_within(&self, moves: u32) -> bool {
        self.best_score.map_or(true, |best| moves <= best)
    }

    /// Display text for the best score, `N/A` when absent.
    #[must_use]
    pub fn score_text(&self) -> String {
        self.best_score
            .map_or_else(|| "N/A".to_string(), |score| score.to_string())
    }

    /// Display text for the best time, `N/A` when absent.
    #[must_use]
    pub fn time_text(&self) -> String {
        self.best_time
            .map_or_else(|| "N/A".to_string(), |time| time.to_string())
    }
}

/// Persistent best records, keyed by difficulty.
///
/// Writes are assumed to succeed; implementations backed by real storage
/// log failures instead of returning them.
pub trait RecordStore {
    /// Stored fewest moves.
    fn best_score(&self, difficulty: Difficulty) -> Option<u32>;

    /// Replace the stored fewest moves.
    fn set_best_score(&mut self, difficulty: Difficulty, moves: u32);

    /// Stored shortest time.
    fn best_time(&self, difficulty: Difficulty) -> Option<Elapsed>;

    /// Replace the stored shortest time.
    fn set_best_time(&mut self, difficulty: Difficulty, elapsed: Elapsed);

    /// Both records for a difficulty.
    fn best_record(&self, difficulty: Difficulty) -> BestRecord {
        BestRecord {
            best_score: self.best_score(difficulty),
            best_time: self.best_time(difficulty),
        }
    }
}

impl<S: RecordStore + ?Sized> RecordStore for &mut S {
    fn best_score(&self, difficulty: Difficulty) -> Option<u32> {
        (**self).best_score(difficulty)
    }

    fn set_best_score(&mut self, difficulty: Difficulty, moves: u32) {
        (**self).set_best_score(difficulty, moves);
    }

    fn best_time(&self, difficulty: Difficulty) -> Option<Elapsed> {
        (**self).best_time(difficulty)
    }

    fn set_best_time(&mut self, difficulty: Difficulty, elapsed: Elapsed) {
        (**self).set_best_time(difficulty, elapsed);
    }
}

/// Key holding the best move count.
#[must_use]
pub fn score_key(difficulty: Difficulty) -> String {
    format!("{}Score", difficulty.name())
}

/// Key holding the best time triple.
#[must_use]
pub fn time_key(difficulty: Difficulty) -> String {
    format!("{}Time", difficulty.name())
}

/// In-memory string key-value store.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryStore {
    entries: FxHashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Set a raw value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn read<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get(key)?;
        match serde_json::from_str(raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!("Ignoring malformed record '{}' = {:?}: {}", key, raw, err);
                None
            }
        }
    }

    fn write<T: Serialize>(&mut self, key: String, value: &T) {
        match serde_json::to_string(value) {
            Ok(raw) => self.set(key, raw),
            Err(err) => warn!("Could not encode record '{}': {}", key, err),
        }
    }
}

impl RecordStore for MemoryStore {
    fn best_score(&self, difficulty: Difficulty) -> Option<u32> {
        self.read(&score_key(difficulty))
    }

    fn set_best_score(&mut self, difficulty: Difficulty, moves: u32) {
        self.write(score_key(difficulty), &moves);
    }

    fn best_time(&self, difficulty: Difficulty) -> Option<Elapsed> {
        self.read(&time_key(difficulty))
    }

    fn set_best_time(&mut self, difficulty: Difficulty, elapsed: Elapsed) {
        self.write(time_key(difficulty), &elapsed);
    }
}
