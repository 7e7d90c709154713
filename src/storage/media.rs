//! Local media store
//!
//! Definition images and pronunciation audio are downloaded once and kept
//! under `<root>/media/images` and `<root>/media/sounds`, named by the basename
//! of the remote URL. Entries reference them by path relative to `<root>`.

use crate::crawler::fetch_bytes;
use crate::storage::write_atomic;
use reqwest::Client;
use std::path::{Path, PathBuf};
use url::Url;

/// Kind of media file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Sound,
}

impl MediaKind {
    fn subdir(&self) -> &'static str {
        match self {
            Self::Image => "media/images",
            Self::Sound => "media/sounds",
        }
    }
}

/// Download cache for images and sounds
pub struct MediaStore {
    root: PathBuf,
    client: Client,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>, client: Client) -> Self {
        Self {
            root: root.into(),
            client,
        }
    }

    /// Relative path a media URL is stored under, or None if the URL has no
    /// usable file name
    pub fn relative_path(kind: MediaKind, url: &str) -> Option<String> {
        let name = media_file_name(url)?;
        Some(format!("{}/{}", kind.subdir(), name))
    }

    /// Makes sure the media at `url` is present locally
    ///
    /// Returns the path relative to the store root. Download failures are
    /// logged and yield `None`; they never fail the caller.
    pub async fn ensure(&self, kind: MediaKind, url: &str) -> Option<String> {
        let relative = match Self::relative_path(kind, url) {
            Some(relative) => relative,
            None => {
                tracing::debug!("No file name in media URL {}", url);
                return None;
            }
        };
        let target = self.root.join(&relative);

        if target.is_file() {
            return Some(relative);
        }

        let bytes = match fetch_bytes(&self.client, url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Failed to download {}: {}", url, e);
                return None;
            }
        };

        match write_atomic(&target, &bytes) {
            Ok(()) => {
                tracing::debug!("Saved media {} to {}", url, target.display());
                Some(relative)
            }
            Err(e) => {
                tracing::warn!("Failed to save media {}: {}", target.display(), e);
                None
            }
        }
    }

    /// Number of files stored for a media kind
    pub fn count(&self, kind: MediaKind) -> usize {
        count_files(&self.root.join(kind.subdir()))
    }
}

/// Basename of the URL path, restricted to file-system safe characters
fn media_file_name(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let last = parsed.path_segments()?.last()?.to_string();

    let name: String = last
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if name.is_empty() || name.chars().all(|c| c == '.') {
        None
    } else {
        Some(name)
    }
}

fn count_files(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .filter(|e| e.path().is_file())
                .count()
        })
        .unwrap_or(0)
}
