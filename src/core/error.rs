//! Error types.
//!
//! Only a handful of operations can fail. Stray input such as flipping a
//! card while no game is running is not an error: those calls are ignored
//! and return no events.

use crate::records::StoreError;

/// Errors surfaced by the game engine.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// The difficulty name is not one of `easy`, `medium` or `hard`.
    ///
    /// Fatal to the `start` call only; the engine stays idle.
    #[error("invalid difficulty '{0}' (expected easy, medium or hard)")]
    InvalidDifficulty(String),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    /// The configuration document could not be parsed.
    #[error("malformed configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// A snapshot could not be encoded or decoded.
    #[error("snapshot encoding failed: {0}")]
    Snapshot(#[from] bincode::Error),

    /// The record store could not be opened.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl GameError {
    /// Returns true if the error was caused by caller input rather than I/O.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidDifficulty(_) | Self::InvalidConfig(_))
    }
}
