use crate::lexicon::Mode;
use std::fmt;

/// Counters produced by one crawl batch
///
/// Reports are returned by the scheduler rather than kept in shared state;
/// callers aggregate them with [`CrawlReport::merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// Modes covered by this report
    pub modes: Vec<Mode>,

    /// Prefixes sent to the search index
    pub prefixes_queried: u64,

    /// Candidate words returned across all prefixes (with repeats)
    pub candidates_seen: u64,

    /// Entries extracted from the site and stored
    pub fetched: u64,

    /// Entries served from the record cache
    pub cached: u64,

    /// Words the site reported as absent
    pub not_found: u64,

    /// Words that failed to fetch, parse or store
    pub failed: u64,

    /// Words reached through synonym, antonym or similar-word links
    pub relation_words: u64,

    /// Distinct words visited
    pub visited: u64,
}

impl CrawlReport {
    pub fn new(mode: Mode) -> Self {
        Self {
            modes: vec![mode],
            ..Self::default()
        }
    }

    /// Adds another report's counters to this one
    pub fn merge(&mut self, other: &CrawlReport) {
        for mode in &other.modes {
            if !self.modes.contains(mode) {
                self.modes.push(*mode);
            }
        }
        self.prefixes_queried += other.prefixes_queried;
        self.candidates_seen += other.candidates_seen;
        self.fetched += other.fetched;
        self.cached += other.cached;
        self.not_found += other.not_found;
        self.failed += other.failed;
        self.relation_words += other.relation_words;
        self.visited += other.visited;
    }

    /// Entries available after the batch, new or cached
    pub fn total_entries(&self) -> u64 {
        self.fetched + self.cached
    }
}

impl fmt::Display for CrawlReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} prefixes, {} visited, {} fetched, {} cached, {} not found, {} failed, {} via relations",
            self.prefixes_queried,
            self.visited,
            self.fetched,
            self.cached,
            self.not_found,
            self.failed,
            self.relation_words
        )
    }
}
