//! Storage traits and error types
//!
//! This module defines the record cache interface and the errors a storage
//! backend can report.

use crate::lexicon::{Entry, Mode};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored record exists but cannot be decoded
    #[error("Corrupt record at {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Per-(mode, word) record cache
///
/// This is the resumability mechanism of the crawler: anything a store
/// returns from [`RecordStore::get`] is served without touching the network.
/// Partitions are independent, so the same word may hold a different entry
/// in each mode.
pub trait RecordStore: Send + Sync {
    /// Returns the stored entry for `(mode, word)`, if any
    ///
    /// An unreadable record is an error, never a miss.
    fn get(&self, mode: Mode, word: &str) -> StorageResult<Option<Entry>>;

    /// Persists `entry` under `(mode, word)`
    ///
    /// Writes are atomic. An existing record is left untouched.
    fn put(&self, mode: Mode, word: &str, entry: &Entry) -> StorageResult<()>;

    /// Returns true if a record exists for `(mode, word)`
    fn contains(&self, mode: Mode, word: &str) -> bool;

    /// Number of records in a mode partition
    fn count(&self, mode: Mode) -> StorageResult<u64>;
}
