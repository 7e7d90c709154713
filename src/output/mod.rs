//! Output module for crawl activity and statistics
//!
//! This module handles:
//! - Recording every observable crawl event to an activity sink
//! - Counting stored records and media for the `--stats` view

mod activity;
pub mod stats;

pub use activity::{Activity, ActivityLog, ActivitySink, MemorySink};
pub use stats::{load_statistics, print_statistics, CrawlStatistics};
