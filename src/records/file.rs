//! JSON file-backed record store.
//!
//! The whole key-value map lives in one JSON object file. Every update
//! rewrites it through a temporary file and a rename, so a crash never
//! leaves a half-written file behind.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::store::{MemoryStore, RecordStore};
use super::StoreError;
use crate::core::{Difficulty, Elapsed};

/// Record store persisted to a JSON file.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: MemoryStore,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => MemoryStore::new(),
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => MemoryStore::new(),
            Err(err) => return Err(err.into()),
        };
        debug!("Opened record store {} ({} keys)", path.display(), entries.len());
        Ok(Self { path, entries })
    }

    /// File backing this store.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The in-memory view of the file.
    #[must_use]
    pub fn entries(&self) -> &MemoryStore {
        &self.entries
    }

    /// Write the current entries to disk.
    pub fn flush(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let data = serde_json::to_string_pretty(&self.entries)?;
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, data)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn persist(&self) {
        if let Err(err) = self.flush() {
            warn!("Could not save records to {}: {}", self.path.display(), err);
        }
    }
}

impl RecordStore for JsonFileStore {
    fn best_score(&self, difficulty: Difficulty) -> Option<u32> {
        self.entries.best_score(difficulty)
    }

    fn set_best_score(&mut self, difficulty: Difficulty, moves: u32) {
        self.entries.set_best_score(difficulty, moves);
        self.persist();
    }

    fn best_time(&self, difficulty: Difficulty) -> Option<Elapsed> {
        self.entries.best_time(difficulty)
    }

    fn set_best_time(&mut self, difficulty: Difficulty, elapsed: Elapsed) {
        self.entries.set_best_time(difficulty, elapsed);
        self.persist();
    }
}
