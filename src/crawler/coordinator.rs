//! Crawler coordinator - wires configuration into a running crawl
//!
//! This module builds every collaborator the scheduler needs:
//! - The shared HTTP client with the configured user agent
//! - The append-only activity log
//! - The JSON record cache and the media store under the data directory
//! - The discovery client and the page extractor
//!
//! It then runs one batch per mode, strictly one after another.

use crate::config::Config;
use crate::crawler::discovery::DiscoveryClient;
use crate::crawler::extractor::{EntrySource, ExtractOutcome, PageExtractor};
use crate::crawler::fetcher::build_http_client;
use crate::crawler::limiter::RateLimiter;
use crate::crawler::scheduler::{CrawlScheduler, TraversalSettings};
use crate::lexicon::Mode;
use crate::output::{ActivityLog, ActivitySink};
use crate::state::CrawlReport;
use crate::storage::{JsonRecordStore, MediaStore, RecordStore};
use crate::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// What a crawl run should cover
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlOptions {
    /// Modes to crawl; empty means the configured modes
    pub modes: Vec<Mode>,

    /// Starting prefixes; empty means each mode's seed alphabet
    pub seeds: Vec<String>,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    scheduler: CrawlScheduler<DiscoveryClient, PageExtractor>,
    configured_modes: Vec<Mode>,
    data_dir: PathBuf,
}

impl Coordinator {
    /// Creates a coordinator logging activity to the configured file
    pub fn new(config: &Config) -> Result<Self> {
        let log = ActivityLog::open(Path::new(&config.output.activity_log))?;
        Self::with_sink(config, Arc::new(log))
    }

    /// Creates a coordinator reporting activity to `sink`
    pub fn with_sink(config: &Config, sink: Arc<dyn ActivitySink>) -> Result<Self> {
        let data_dir = PathBuf::from(&config.output.data_dir);
        std::fs::create_dir_all(&data_dir)?;

        let client = build_http_client(&config.user_agent)?;

        let store: Arc<dyn RecordStore> =
            Arc::new(JsonRecordStore::new(data_dir.clone(), sink.clone()));
        let media = MediaStore::new(data_dir.clone(), client.clone());

        let extractor = PageExtractor::new(
            client.clone(),
            config.source.detail_url.clone(),
            store,
            media,
            sink.clone(),
        );
        let discovery = DiscoveryClient::new(client, &config.source, sink.clone());

        let scheduler = CrawlScheduler::new(
            discovery,
            extractor,
            RateLimiter::from_millis(config.crawler.request_delay_ms),
            sink,
            TraversalSettings {
                branch_threshold: config.crawler.branch_threshold,
                relation_depth: config.crawler.relation_depth,
            },
        );

        Ok(Self {
            scheduler,
            configured_modes: config.crawler.modes.clone(),
            data_dir,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Runs one batch per mode and aggregates their reports
    pub async fn run(&self, options: &CrawlOptions) -> CrawlReport {
        let modes = if options.modes.is_empty() {
            &self.configured_modes
        } else {
            &options.modes
        };

        let mut total = CrawlReport::default();
        for &mode in modes {
            tracing::info!("Starting {} batch", mode);
            let report = if options.seeds.is_empty() {
                self.scheduler.run_batch(mode).await
            } else {
                self.scheduler
                    .run_batch_with_seeds(mode, options.seeds.clone())
                    .await
            };
            tracing::info!("{} batch complete: {}", mode, report);
            total.merge(&report);
        }
        total
    }

    /// Fetch-or-build the record for a single word
    pub async fn fetch_word(&self, word: &str, mode: Mode) -> ExtractOutcome {
        let outcome = self.scheduler.extractor().extract(word, mode).await;
        self.scheduler.limiter().pause().await;
        outcome
    }
}

/// Runs a complete crawl and returns the aggregated report
pub async fn run_crawl(config: &Config, options: &CrawlOptions) -> Result<CrawlReport> {
    let coordinator = Coordinator::new(config)?;
    Ok(coordinator.run(options).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CrawlerConfig, OutputConfig, SourceConfig, UserAgentConfig};
    use crate::output::MemorySink;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base: &str, dir: &Path, modes: Vec<Mode>) -> Config {
        Config {
            crawler: CrawlerConfig {
                request_delay_ms: 0,
                branch_threshold: 9,
                relation_depth: 2,
                modes,
            },
            source: SourceConfig {
                english_search_url: format!("{}/search_en.php", base),
                khmer_search_url: format!("{}/search_kh.php", base),
                detail_url: format!("{}/word.php", base),
            },
            user_agent: UserAgentConfig {
                crawler_name: "TestBot".to_string(),
                crawler_version: "1.0".to_string(),
                contact_url: "https://example.com/about".to_string(),
                contact_email: "test@example.com".to_string(),
            },
            output: OutputConfig {
                data_dir: dir.join("data").to_string_lossy().into_owned(),
                activity_log: dir.join("logs/activity.log").to_string_lossy().into_owned(),
            },
        }
    }

    #[test]
    fn test_new_creates_data_dir_and_log() {
        let dir = TempDir::new().unwrap();
        let config = test_config("http://127.0.0.1:9", dir.path(), vec![Mode::EnKh]);

        let coordinator = Coordinator::new(&config).unwrap();

        assert!(coordinator.data_dir().is_dir());
        assert!(dir.path().join("logs/activity.log").is_file());
    }

    #[tokio::test]
    async fn test_run_uses_explicit_modes_and_seeds() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search_en.php"))
            .and(query_param("q", "zy"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<a>zygote</a>"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/word.php"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<table><tr><td>Definition:</td></tr><tr><td class="khmer">ហ្សាយហ្គោត</td></tr></table>"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let config = test_config(&server.uri(), dir.path(), Mode::ALL.to_vec());
        let sink = Arc::new(MemorySink::new());
        let coordinator = Coordinator::with_sink(&config, sink.clone()).unwrap();

        let report = coordinator
            .run(&CrawlOptions {
                modes: vec![Mode::EnKh],
                seeds: vec!["zy".to_string()],
            })
            .await;

        assert_eq!(report.modes, vec![Mode::EnKh]);
        assert_eq!(report.fetched, 1);
        assert!(dir.path().join("data/en_kh/zygote.json").is_file());
        assert_eq!(sink.count("batch-start"), 1);
    }

    #[tokio::test]
    async fn test_fetch_word_reuses_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/word.php"))
            .and(query_param("mode", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<table><tr><td>Definition:</td></tr><tr><td class="khmer">ឆ្មា</td></tr></table>"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let config = test_config(&server.uri(), dir.path(), vec![Mode::EnKh]);
        let coordinator = Coordinator::with_sink(&config, Arc::new(MemorySink::new())).unwrap();

        let first = coordinator.fetch_word("cat", Mode::EnKh).await;
        let second = coordinator.fetch_word("cat", Mode::EnKh).await;

        assert!(matches!(first, ExtractOutcome::Fetched(_)));
        assert!(matches!(second, ExtractOutcome::Cached(_)));
        assert_eq!(coordinator.scheduler.limiter().pauses(), 2);
    }
}
