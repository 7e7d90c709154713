//! Statistics generation from the record cache
//!
//! This module provides functionality for counting what a crawl has stored
//! so far and displaying it.

use crate::lexicon::Mode;
use crate::storage::{MediaKind, MediaStore, RecordStore, StorageError};
use std::collections::BTreeMap;

/// Record cache statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Stored records per mode partition
    pub records_by_mode: BTreeMap<Mode, u64>,

    /// Downloaded definition images
    pub images: u64,

    /// Downloaded pronunciation files
    pub sounds: u64,
}

impl CrawlStatistics {
    /// Records across all partitions
    pub fn total_records(&self) -> u64 {
        self.records_by_mode.values().sum()
    }
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `store` - The record cache to count
/// * `media` - The media store sharing the cache's data directory
///
/// # Returns
///
/// * `Ok(CrawlStatistics)` - Successfully counted
/// * `Err(StorageError)` - A partition could not be read
pub fn load_statistics(
    store: &dyn RecordStore,
    media: &MediaStore,
) -> Result<CrawlStatistics, StorageError> {
    let mut records_by_mode = BTreeMap::new();
    for mode in Mode::ALL {
        records_by_mode.insert(mode, store.count(mode)?);
    }

    Ok(CrawlStatistics {
        records_by_mode,
        images: media.count(MediaKind::Image) as u64,
        sounds: media.count(MediaKind::Sound) as u64,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Dictionary Statistics ===\n");

    println!("Records by Mode:");
    let total = stats.total_records();
    for (mode, count) in &stats.records_by_mode {
        let percentage = if total > 0 {
            (*count as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", mode, count, percentage);
    }
    println!("  Total: {}", total);
    println!();

    println!("Media:");
    println!("  Images: {}", stats.images);
    println!("  Sounds: {}", stats.sounds);
}
