//! Binary snapshots of a running game.
//!
//! A snapshot captures the configuration, the RNG position and the whole
//! session, timers included. Restoring it with the same store yields a game
//! that answers every later input and `advance` with the same events.
//! The store is not part of the snapshot.

use serde::{Deserialize, Serialize};

use super::engine::MemoryGame;
use super::session::GameSession;
use crate::core::{GameConfig, GameError, GameRng, GameRngState};
use crate::records::RecordStore;

/// Serialized form of a `MemoryGame` minus its store.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub config: GameConfig,
    pub rng: GameRngState,
    pub session: GameSession,
}

impl GameSnapshot {
    /// Encode with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, GameError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode from bincode.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, GameError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

impl<S: RecordStore> MemoryGame<S> {
    /// Capture the current state.
    #[must_use]
    pub fn to_snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            config: self.config.clone(),
            rng: self.rng.state(),
            session: self.session.clone(),
        }
    }

    /// Encode the current state as bytes.
    pub fn snapshot(&self) -> Result<Vec<u8>, GameError> {
        self.to_snapshot().to_bytes()
    }

    /// Rebuild a game from a snapshot.
    ///
    /// Fails if the configuration or the session does not validate.
    pub fn from_snapshot(snapshot: GameSnapshot, store: S) -> Result<Self, GameError> {
        snapshot.config.validate()?;
        snapshot.session.validate()?;
        let rng = GameRng::from_state(&snapshot.rng);
        Ok(Self::from_parts(snapshot.config, rng, snapshot.session, store))
    }

    /// Rebuild a game from `snapshot` bytes.
    pub fn restore(bytes: &[u8], store: S) -> Result<Self, GameError> {
        Self::from_snapshot(GameSnapshot::from_bytes(bytes)?, store)
    }
}
