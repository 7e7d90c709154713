//! Prefix search client
//!
//! The source site exposes an autocomplete-style search returning an HTML
//! fragment of anchors. English prefixes go to one endpoint, Khmer prefixes
//! (used by both Khmer-indexed modes) to another.

use crate::config::SourceConfig;
use crate::crawler::fetcher::{fetch_url, FetchResult};
use crate::lexicon::{Mode, SearchIndex};
use crate::output::{Activity, ActivitySink};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{Html, Selector};
use std::sync::Arc;
use url::Url;

static ANCHOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a").expect("static selector is valid"));

/// Source of candidate words for a prefix
#[async_trait]
pub trait WordSource: Send + Sync {
    /// Candidate words starting with `prefix`, in server order
    ///
    /// Never fails: transport problems yield an empty list and are reported
    /// to the activity stream.
    async fn discover(&self, prefix: &str, mode: Mode) -> Vec<String>;
}

/// HTTP client for the site's prefix search
pub struct DiscoveryClient {
    client: Client,
    english_search_url: String,
    khmer_search_url: String,
    sink: Arc<dyn ActivitySink>,
}

impl DiscoveryClient {
    pub fn new(client: Client, source: &SourceConfig, sink: Arc<dyn ActivitySink>) -> Self {
        Self {
            client,
            english_search_url: source.english_search_url.clone(),
            khmer_search_url: source.khmer_search_url.clone(),
            sink,
        }
    }

    /// Builds `<search-endpoint>?q=<prefix>` for the mode's index
    pub fn search_url(&self, prefix: &str, mode: Mode) -> Result<Url, url::ParseError> {
        let base = match mode.search_index() {
            SearchIndex::English => &self.english_search_url,
            SearchIndex::Khmer => &self.khmer_search_url,
        };
        let mut url = Url::parse(base)?;
        url.query_pairs_mut().append_pair("q", prefix);
        Ok(url)
    }

    /// Records a failed search; the prefix stands in for the word
    fn fail(&self, prefix: &str, mode: Mode, message: String) -> Vec<String> {
        tracing::warn!("Search for '{}' ({}) failed: {}", prefix, mode, message);
        self.sink.record(Activity::Error {
            mode,
            word: prefix.to_string(),
            message,
        });
        Vec::new()
    }
}

#[async_trait]
impl WordSource for DiscoveryClient {
    async fn discover(&self, prefix: &str, mode: Mode) -> Vec<String> {
        let url = match self.search_url(prefix, mode) {
            Ok(url) => url,
            Err(e) => return self.fail(prefix, mode, format!("invalid search URL: {}", e)),
        };

        match fetch_url(&self.client, url.as_str()).await {
            FetchResult::Success { body, .. } => parse_candidates(&body),
            FetchResult::HttpError { status_code } => {
                self.fail(prefix, mode, format!("search returned HTTP {}", status_code))
            }
            FetchResult::NetworkError { error } => self.fail(prefix, mode, error),
        }
    }
}

/// Extracts the trimmed text of every anchor in a search fragment
pub fn parse_candidates(fragment: &str) -> Vec<String> {
    let html = Html::parse_fragment(fragment);
    html.select(&ANCHOR)
        .map(|a| a.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect()
}
