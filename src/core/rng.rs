//! Deterministic random number generation and shuffling.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical deals
//! - **Serializable**: O(1) state capture and restore for snapshots
//! - **Two shuffle modes**: canonical Fisher-Yates and the single-cycle
//!   Sattolo variant
//!
//! ## Usage
//!
//! ```
//! use memory_match::core::{GameRng, ShuffleMode};
//!
//! let mut rng = GameRng::new(42);
//! let mut cards = vec![1, 2, 3, 4, 5];
//! rng.shuffle(&mut cards, ShuffleMode::FisherYates);
//!
//! cards.sort();
//! assert_eq!(cards, vec![1, 2, 3, 4, 5]);
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// How a slice is permuted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShuffleMode {
    /// Canonical Fisher-Yates: for `i` from the end down to 1, swap with a
    /// `j` drawn uniformly from `[0, i]`. Every permutation is equally likely.
    #[default]
    FisherYates,

    /// Sattolo's variant: `j` is drawn from `[0, i)`, so position `i` never
    /// swaps with itself. Only single-cycle permutations are produced, which
    /// means no element ever stays in place when the slice has two or more
    /// elements. This is the behavior of the original browser game.
    Sattolo,
}

/// Deterministic RNG for dealing boards.
///
/// Uses ChaCha8 for speed while maintaining good statistical quality.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an RNG seeded from the operating system's entropy source.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// The seed this RNG was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Shuffle a slice in place with the given algorithm.
    ///
    /// Empty and single-element slices are left untouched.
    pub fn shuffle<T>(&mut self, slice: &mut [T], mode: ShuffleMode) {
        match mode {
            ShuffleMode::FisherYates => {
                use rand::seq::SliceRandom;
                slice.shuffle(&mut self.inner);
            }
            ShuffleMode::Sattolo => {
                for i in (1..slice.len()).rev() {
                    let j = self.inner.gen_range(0..i);
                    slice.swap(i, j);
                }
            }
        }
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

/// Serializable RNG state for snapshots.
///
/// Uses ChaCha8 word position for O(1) serialization regardless of
/// how many random numbers have been generated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}
