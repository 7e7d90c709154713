//! Activity stream
//!
//! Every observable step of a crawl (cache skip, fetch attempt, not-found,
//! error, batch milestones) is reported to an [`ActivitySink`]. The file-backed
//! [`ActivityLog`] appends one timestamped line per event and mirrors it to
//! `tracing`; [`MemorySink`] keeps events in memory for tests.

use crate::lexicon::Mode;
use chrono::{SecondsFormat, Utc};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

/// A single observable crawl event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activity {
    /// Record already cached, no network access
    Skip { mode: Mode, word: String },

    /// Detail page requested
    Fetch { mode: Mode, word: String, url: String },

    /// New record written
    Stored { mode: Mode, word: String, path: String },

    /// The site reported the word as absent
    NotFound { mode: Mode, word: String },

    /// Fetch, parse or storage failure for one word
    Error {
        mode: Mode,
        word: String,
        message: String,
    },

    /// Prefix search answered
    Discover {
        mode: Mode,
        prefix: String,
        candidates: usize,
    },

    BatchStart { mode: Mode },

    BatchEnd { mode: Mode, summary: String },
}

impl Activity {
    /// Short key identifying the event kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Skip { .. } => "skip",
            Self::Fetch { .. } => "fetch",
            Self::Stored { .. } => "stored",
            Self::NotFound { .. } => "not-found",
            Self::Error { .. } => "error",
            Self::Discover { .. } => "discover",
            Self::BatchStart { .. } => "batch-start",
            Self::BatchEnd { .. } => "batch-end",
        }
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skip { mode, word } => write!(f, "{} '{}' already cached, skipping", mode, word),
            Self::Fetch { mode, word, url } => write!(f, "{} fetching '{}' from {}", mode, word, url),
            Self::Stored { mode, word, path } => write!(f, "{} stored '{}' at {}", mode, word, path),
            Self::NotFound { mode, word } => write!(f, "{} '{}' not found on site", mode, word),
            Self::Error {
                mode,
                word,
                message,
            } => write!(f, "{} error on '{}': {}", mode, word, message),
            Self::Discover {
                mode,
                prefix,
                candidates,
            } => write!(f, "{} prefix '{}' returned {} candidates", mode, prefix, candidates),
            Self::BatchStart { mode } => write!(f, "{} batch started", mode),
            Self::BatchEnd { mode, summary } => write!(f, "{} batch finished: {}", mode, summary),
        }
    }
}

/// Receiver of crawl activity
pub trait ActivitySink: Send + Sync {
    fn record(&self, activity: Activity);
}

/// Append-only activity file
pub struct ActivityLog {
    file: Mutex<File>,
}

impl ActivityLog {
    /// Opens (or creates) the activity file in append mode
    pub fn open(path: &Path) -> std::io::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl ActivitySink for ActivityLog {
    fn record(&self, activity: Activity) {
        match &activity {
            Activity::Error { .. } => tracing::warn!("{}", activity),
            Activity::BatchStart { .. } | Activity::BatchEnd { .. } | Activity::Stored { .. } => {
                tracing::info!("{}", activity)
            }
            _ => tracing::debug!("{}", activity),
        }

        let line = format!(
            "{} [{}] {}\n",
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            activity.kind(),
            activity
        );
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = file.write_all(line.as_bytes()) {
            tracing::warn!("Failed to append to activity log: {}", e);
        }
    }
}

/// In-memory sink
#[derive(Default)]
pub struct MemorySink {
    events: Mutex<Vec<Activity>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded events
    pub fn events(&self) -> Vec<Activity> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of recorded events of the given kind
    pub fn count(&self, kind: &str) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|a| a.kind() == kind)
            .count()
    }
}

impl ActivitySink for MemorySink {
    fn record(&self, activity: Activity) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(activity);
    }
}
