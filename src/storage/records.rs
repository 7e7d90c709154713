//! JSON file record store
//!
//! Records live at `<root>/<partition>/<normalize(word)>.json`.

use crate::lexicon::{normalize_word, Entry, Mode};
use crate::output::{Activity, ActivitySink};
use crate::storage::traits::{RecordStore, StorageError, StorageResult};
use crate::storage::write_atomic;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// File-per-entry record cache
pub struct JsonRecordStore {
    root: PathBuf,
    sink: Arc<dyn ActivitySink>,
}

impl JsonRecordStore {
    /// Creates a store rooted at `root`
    ///
    /// Partition directories are created lazily on first write.
    pub fn new(root: impl Into<PathBuf>, sink: Arc<dyn ActivitySink>) -> Self {
        Self {
            root: root.into(),
            sink,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the record for `(mode, word)`
    pub fn record_path(&self, mode: Mode, word: &str) -> PathBuf {
        self.root
            .join(mode.partition())
            .join(format!("{}.json", normalize_word(word)))
    }

    fn read_record(&self, path: &Path) -> StorageResult<Option<Entry>> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let entry = serde_json::from_slice(&bytes).map_err(|source| StorageError::Corrupt {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Some(entry))
    }
}

impl RecordStore for JsonRecordStore {
    fn get(&self, mode: Mode, word: &str) -> StorageResult<Option<Entry>> {
        let path = self.record_path(mode, word);
        let entry = self.read_record(&path)?;
        if entry.is_some() {
            self.sink.record(Activity::Skip {
                mode,
                word: word.to_string(),
            });
        }
        Ok(entry)
    }

    fn put(&self, mode: Mode, word: &str, entry: &Entry) -> StorageResult<()> {
        let path = self.record_path(mode, word);
        if path.exists() {
            self.sink.record(Activity::Skip {
                mode,
                word: word.to_string(),
            });
            return Ok(());
        }

        let json = serde_json::to_vec_pretty(entry)?;
        write_atomic(&path, &json)?;

        self.sink.record(Activity::Stored {
            mode,
            word: word.to_string(),
            path: path.display().to_string(),
        });
        Ok(())
    }

    fn contains(&self, mode: Mode, word: &str) -> bool {
        self.record_path(mode, word).is_file()
    }

    fn count(&self, mode: Mode) -> StorageResult<u64> {
        let dir = self.root.join(mode.partition());
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut count = 0;
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                count += 1;
            }
        }
        Ok(count)
    }
}
