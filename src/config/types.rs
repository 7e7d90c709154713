use crate::lexicon::Mode;
use serde::Deserialize;

/// Main configuration structure for Dict-Ripple
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub source: SourceConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Pause after every outbound extraction or discovery request (milliseconds)
    #[serde(rename = "request-delay-ms", default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Candidate count at which a prefix is expanded one level deeper
    #[serde(rename = "branch-threshold", default = "default_branch_threshold")]
    pub branch_threshold: usize,

    /// Relation traversal depth; values above 1 follow synonyms, antonyms
    /// and similar words one hop
    #[serde(rename = "relation-depth", default = "default_relation_depth")]
    pub relation_depth: u32,

    /// Modes crawled, in batch order
    #[serde(default = "default_modes")]
    pub modes: Vec<Mode>,
}

/// Remote dictionary endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Prefix search for English headwords
    #[serde(rename = "english-search-url")]
    pub english_search_url: String,

    /// Prefix search for Khmer headwords
    #[serde(rename = "khmer-search-url")]
    pub khmer_search_url: String,

    /// Word detail page
    #[serde(rename = "detail-url")]
    pub detail_url: String,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Root of the record partitions and the media store
    #[serde(rename = "data-dir")]
    pub data_dir: String,

    /// Append-only activity file
    #[serde(rename = "activity-log")]
    pub activity_log: String,
}

fn default_request_delay_ms() -> u64 {
    1000
}

fn default_branch_threshold() -> usize {
    9
}

fn default_relation_depth() -> u32 {
    2
}

fn default_modes() -> Vec<Mode> {
    Mode::ALL.to_vec()
}
