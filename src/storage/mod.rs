//! Storage module for persisting extracted entries
//!
//! This module handles everything the crawler writes to disk:
//! - One JSON record per (mode, word), partitioned by mode
//! - Downloaded images and pronunciation audio
//! - Atomic write-then-rename so a killed process never leaves a partial file

mod media;
mod records;
mod traits;

pub use media::{MediaKind, MediaStore};
pub use records::JsonRecordStore;
pub use traits::{RecordStore, StorageError, StorageResult};

use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Writes `bytes` to `path` atomically
///
/// The content goes to a temporary file in the destination directory, is
/// synced, and is then renamed over `path`.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
