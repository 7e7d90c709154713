//! Crawler module for dictionary discovery and extraction
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a polite user agent
//! - Prefix search against the site's index
//! - Detail page parsing for each translation mode
//! - Fetch-or-build record extraction with media download
//! - Adaptive prefix scheduling and rate limiting
//! - Overall crawl coordination

mod coordinator;
mod discovery;
mod extractor;
mod fetcher;
mod limiter;
mod parser;
mod scheduler;

pub use coordinator::{run_crawl, Coordinator, CrawlOptions};
pub use discovery::{parse_candidates, DiscoveryClient, WordSource};
pub use extractor::{EntrySource, ExtractOutcome, PageExtractor};
pub use fetcher::{build_http_client, fetch_bytes, fetch_url, user_agent_string, FetchResult};
pub use limiter::RateLimiter;
pub use parser::{clean_related, is_not_found, parse_entry_page, PageContent};
pub use scheduler::{CrawlScheduler, TraversalSettings, DEFAULT_BRANCH_THRESHOLD};

use crate::config::Config;
use crate::state::CrawlReport;
use crate::Result;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Open the activity log and the record cache
/// 2. Build the HTTP client
/// 3. Run one adaptive prefix batch per mode
/// 4. Return the aggregated report
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `options` - Mode and seed overrides
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Counters for every batch that ran
/// * `Err(RippleError)` - The crawl could not be set up
pub async fn crawl(config: &Config, options: &CrawlOptions) -> Result<CrawlReport> {
    run_crawl(config, options).await
}
