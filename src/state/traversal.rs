use crate::lexicon::{normalize_word, Mode};
use crate::state::CrawlReport;
use std::collections::HashSet;

/// Process-local identity of a word within a batch: `MODE:normalize(word)`
pub fn visited_key(mode: Mode, word: &str) -> String {
    format!("{}:{}", mode.as_str(), normalize_word(word))
}

/// A prefix waiting to be sent to the search index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryTask {
    pub prefix: String,
    pub mode: Mode,
}

impl DiscoveryTask {
    pub fn new(prefix: impl Into<String>, mode: Mode) -> Self {
        Self {
            prefix: prefix.into(),
            mode,
        }
    }

    /// Prefix length in characters (not bytes; Khmer symbols are multi-byte)
    pub fn depth(&self) -> usize {
        self.prefix.chars().count()
    }
}

/// Traversal state owned by one scheduler batch
///
/// Pending expansions are kept on an explicit stack so deep prefix trees
/// never grow the call stack. Children are pushed in reverse so tasks pop in
/// the same depth-first order a recursive walk would visit them.
#[derive(Debug)]
pub struct TraversalContext {
    mode: Mode,
    visited: HashSet<String>,
    pending: Vec<DiscoveryTask>,
    pub report: CrawlReport,
}

impl TraversalContext {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            visited: HashSet::new(),
            pending: Vec::new(),
            report: CrawlReport::new(mode),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Queues prefixes so that the first one is expanded first
    pub fn push_prefixes<I>(&mut self, prefixes: I)
    where
        I: IntoIterator<Item = String>,
        I::IntoIter: DoubleEndedIterator,
    {
        for prefix in prefixes.into_iter().rev() {
            self.pending.push(DiscoveryTask::new(prefix, self.mode));
        }
    }

    /// Queues `parent.prefix + symbol` for every symbol, in alphabet order
    pub fn push_children(&mut self, parent: &DiscoveryTask, alphabet: &[String]) {
        self.push_prefixes(
            alphabet
                .iter()
                .map(|symbol| format!("{}{}", parent.prefix, symbol))
                .collect::<Vec<_>>(),
        );
    }

    /// Next prefix to expand
    pub fn next_task(&mut self) -> Option<DiscoveryTask> {
        self.pending.pop()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Marks a word visited; returns false if it already was
    pub fn mark_visited(&mut self, word: &str) -> bool {
        self.visited.insert(visited_key(self.mode, word))
    }

    pub fn is_visited(&self, word: &str) -> bool {
        self.visited.contains(&visited_key(self.mode, word))
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Finishes the batch and hands back its report
    pub fn into_report(mut self) -> CrawlReport {
        self.report.visited = self.visited.len() as u64;
        self.report
    }
}
