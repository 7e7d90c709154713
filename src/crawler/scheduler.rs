//! Crawl scheduler
//!
//! Drives one batch per mode:
//! - Seeds the traversal with the mode's alphabet (or explicit prefixes)
//! - Asks the search index for candidates of each prefix
//! - Materializes every unseen candidate through the extractor
//! - Follows synonyms, antonyms and similar words one hop
//! - Expands a prefix one symbol deeper when its result page looks full
//!
//! Requests are strictly sequential; the rate limiter pauses after every
//! discovery call and every extraction, cache hits included.

use crate::crawler::discovery::WordSource;
use crate::crawler::extractor::{EntrySource, ExtractOutcome};
use crate::crawler::limiter::RateLimiter;
use crate::lexicon::Mode;
use crate::output::{Activity, ActivitySink};
use crate::state::{CrawlReport, DiscoveryTask, TraversalContext};
use std::sync::Arc;

/// Result pages with at least this many hits are treated as truncated
pub const DEFAULT_BRANCH_THRESHOLD: usize = 9;

/// Traversal knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraversalSettings {
    /// Candidate count that triggers prefix expansion
    pub branch_threshold: usize,

    /// Values above 1 enable one-hop relation traversal
    pub relation_depth: u32,
}

impl Default for TraversalSettings {
    fn default() -> Self {
        Self {
            branch_threshold: DEFAULT_BRANCH_THRESHOLD,
            relation_depth: 2,
        }
    }
}

impl TraversalSettings {
    fn follows_relations(&self) -> bool {
        self.relation_depth > 1
    }
}

/// Scheduler owning the discovery and extraction collaborators
///
/// Each call to [`CrawlScheduler::run_batch`] builds a fresh
/// [`TraversalContext`], so batches never share visited sets.
pub struct CrawlScheduler<D, E> {
    discovery: D,
    extractor: E,
    limiter: RateLimiter,
    sink: Arc<dyn ActivitySink>,
    settings: TraversalSettings,
}

impl<D, E> CrawlScheduler<D, E>
where
    D: WordSource,
    E: EntrySource,
{
    pub fn new(
        discovery: D,
        extractor: E,
        limiter: RateLimiter,
        sink: Arc<dyn ActivitySink>,
        settings: TraversalSettings,
    ) -> Self {
        Self {
            discovery,
            extractor,
            limiter,
            sink,
            settings,
        }
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn extractor(&self) -> &E {
        &self.extractor
    }

    /// Crawls a mode starting from its seed alphabet
    pub async fn run_batch(&self, mode: Mode) -> CrawlReport {
        self.run_batch_with_seeds(mode, mode.seed_alphabet()).await
    }

    /// Crawls a mode starting from explicit prefixes
    ///
    /// Seeds longer than the mode's prefix bound are skipped.
    pub async fn run_batch_with_seeds(&self, mode: Mode, seeds: Vec<String>) -> CrawlReport {
        self.sink.record(Activity::BatchStart { mode });

        let max_len = mode.max_prefix_len();
        let seeds: Vec<String> = seeds
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .filter(|s| {
                let within = s.chars().count() <= max_len;
                if !within {
                    tracing::warn!("Skipping seed '{}': longer than {} characters", s, max_len);
                }
                within
            })
            .collect();

        let mut ctx = TraversalContext::new(mode);
        ctx.push_prefixes(seeds);

        while let Some(task) = ctx.next_task() {
            self.expand(&mut ctx, task).await;
        }

        let report = ctx.into_report();
        self.sink.record(Activity::BatchEnd {
            mode,
            summary: report.to_string(),
        });
        report
    }

    /// Processes one prefix and queues its children if the result looks full
    async fn expand(&self, ctx: &mut TraversalContext, task: DiscoveryTask) {
        let mode = ctx.mode();

        let candidates = self.discovery.discover(&task.prefix, mode).await;
        self.limiter.pause().await;

        ctx.report.prefixes_queried += 1;
        ctx.report.candidates_seen += candidates.len() as u64;
        self.sink.record(Activity::Discover {
            mode,
            prefix: task.prefix.clone(),
            candidates: candidates.len(),
        });

        for candidate in &candidates {
            if !ctx.mark_visited(candidate) {
                continue;
            }

            let outcome = self.visit(ctx, candidate).await;

            if !self.settings.follows_relations() {
                continue;
            }
            if let Some(entry) = outcome.entry() {
                for related in entry.related_words() {
                    if ctx.mark_visited(&related) {
                        ctx.report.relation_words += 1;
                        self.visit(ctx, &related).await;
                    }
                }
            }
        }

        if candidates.len() >= self.settings.branch_threshold && task.depth() < mode.max_prefix_len()
        {
            tracing::debug!(
                "Prefix '{}' returned {} candidates, expanding",
                task.prefix,
                candidates.len()
            );
            ctx.push_children(&task, &mode.expansion_alphabet());
        }
    }

    /// Extracts one word and records the outcome
    async fn visit(&self, ctx: &mut TraversalContext, word: &str) -> ExtractOutcome {
        let outcome = self.extractor.extract(word, ctx.mode()).await;

        match &outcome {
            ExtractOutcome::Fetched(_) => ctx.report.fetched += 1,
            ExtractOutcome::Cached(_) => ctx.report.cached += 1,
            ExtractOutcome::NotFound => ctx.report.not_found += 1,
            ExtractOutcome::Failed(_) => ctx.report.failed += 1,
        }

        self.limiter.pause().await;

        outcome
    }
}
