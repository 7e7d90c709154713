//! State module for tracking crawl progress
//!
//! This module provides the per-batch traversal state of the crawl scheduler.
//!
//! # Components
//!
//! - `TraversalContext`: visited words and pending prefix expansions of one batch
//! - `DiscoveryTask`: a prefix waiting to be sent to the search index
//! - `CrawlReport`: counters returned to the caller when a batch finishes

mod report;
mod traversal;

// Re-export main types
pub use report::CrawlReport;
pub use traversal::{visited_key, DiscoveryTask, TraversalContext};
