//! Best-record persistence.
//!
//! - `RecordStore`: the interface the game reads at start and writes at end
//! - `MemoryStore`: string key-value map, also the file format
//! - `JsonFileStore`: `MemoryStore` persisted to disk

mod file;
mod store;

pub use file::JsonFileStore;
pub use store::{score_key, time_key, BestRecord, MemoryStore, RecordStore};

/// Errors opening or writing a record file.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("record store is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
