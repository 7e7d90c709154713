//! Fetch-or-build for a single (word, mode)
//!
//! The extractor is the only way the scheduler materializes entries:
//! 1. Serve from the record cache if the entry exists
//! 2. Fetch the detail page
//! 3. Parse it for the mode
//! 4. Download referenced media
//! 5. Persist the entry
//!
//! Every failure is caught here and reported as an outcome; nothing is retried.

use crate::crawler::fetcher::{fetch_url, FetchResult};
use crate::crawler::parser::{parse_entry_page, PageContent};
use crate::lexicon::{Entry, Mode};
use crate::output::{Activity, ActivitySink};
use crate::storage::{MediaKind, MediaStore, RecordStore};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use url::Url;

/// Result of materializing one word
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractOutcome {
    /// Extracted from the site and stored
    Fetched(Entry),

    /// Served from the record cache without a request
    Cached(Entry),

    /// The site reported the word as absent
    NotFound,

    /// Fetch, parse or storage failure
    Failed(String),
}

impl ExtractOutcome {
    /// The entry, if one was produced
    pub fn entry(&self) -> Option<&Entry> {
        match self {
            Self::Fetched(entry) | Self::Cached(entry) => Some(entry),
            Self::NotFound | Self::Failed(_) => None,
        }
    }
}

/// Something that can produce the entry for a (word, mode)
#[async_trait]
pub trait EntrySource: Send + Sync {
    async fn extract(&self, word: &str, mode: Mode) -> ExtractOutcome;
}

/// Detail-page extractor backed by the record cache and media store
pub struct PageExtractor {
    client: Client,
    detail_url: String,
    store: Arc<dyn RecordStore>,
    media: MediaStore,
    sink: Arc<dyn ActivitySink>,
}

impl PageExtractor {
    pub fn new(
        client: Client,
        detail_url: impl Into<String>,
        store: Arc<dyn RecordStore>,
        media: MediaStore,
        sink: Arc<dyn ActivitySink>,
    ) -> Self {
        Self {
            client,
            detail_url: detail_url.into(),
            store,
            media,
            sink,
        }
    }

    /// Builds `<detail-endpoint>?mode=<1|2|3>&word=<word>`
    pub fn page_url(&self, word: &str, mode: Mode) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&self.detail_url)?;
        url.query_pairs_mut()
            .append_pair("mode", &mode.detail_code().to_string())
            .append_pair("word", word);
        Ok(url)
    }

    fn fail(&self, mode: Mode, word: &str, message: String) -> ExtractOutcome {
        self.sink.record(Activity::Error {
            mode,
            word: word.to_string(),
            message: message.clone(),
        });
        ExtractOutcome::Failed(message)
    }

    /// Downloads definition images and audio, filling in local paths
    async fn attach_media(&self, entry: &mut Entry) {
        for definition in &mut entry.definitions {
            if let Some(url) = &definition.image_url {
                definition.local_image_path = self.media.ensure(MediaKind::Image, url).await;
            }
        }
        if let Some(url) = &entry.sound_url {
            entry.local_sound_path = self.media.ensure(MediaKind::Sound, url).await;
        }
    }
}

#[async_trait]
impl EntrySource for PageExtractor {
    async fn extract(&self, word: &str, mode: Mode) -> ExtractOutcome {
        match self.store.get(mode, word) {
            Ok(Some(entry)) => return ExtractOutcome::Cached(entry),
            Ok(None) => {}
            Err(e) => return self.fail(mode, word, e.to_string()),
        }

        let url = match self.page_url(word, mode) {
            Ok(url) => url,
            Err(e) => return self.fail(mode, word, format!("invalid detail URL: {}", e)),
        };

        self.sink.record(Activity::Fetch {
            mode,
            word: word.to_string(),
            url: url.to_string(),
        });

        let body = match fetch_url(&self.client, url.as_str()).await {
            FetchResult::Success { body, .. } => body,
            FetchResult::HttpError { status_code } => {
                return self.fail(mode, word, format!("HTTP {}", status_code))
            }
            FetchResult::NetworkError { error } => return self.fail(mode, word, error),
        };

        let mut entry = match parse_entry_page(&body, word, mode, &url) {
            PageContent::Entry(entry) => entry,
            PageContent::NotFound => {
                self.sink.record(Activity::NotFound {
                    mode,
                    word: word.to_string(),
                });
                return ExtractOutcome::NotFound;
            }
        };

        self.attach_media(&mut entry).await;

        if let Err(e) = self.store.put(mode, word, &entry) {
            return self.fail(mode, word, e.to_string());
        }

        ExtractOutcome::Fetched(entry)
    }
}
