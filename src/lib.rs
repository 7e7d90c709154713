//! Dict-Ripple: a resumable dictionary harvester
//!
//! This crate discovers words through a remote prefix-search index, extracts
//! their detail pages into structured entries, and persists each entry as a
//! JSON record keyed by its normalized headword, so an interrupted run resumes
//! by skipping everything already on disk.

pub mod config;
pub mod crawler;
pub mod lexicon;
pub mod output;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for Dict-Ripple operations
#[derive(Debug, Error)]
pub enum RippleError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Dict-Ripple operations
pub type Result<T> = std::result::Result<T, RippleError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use lexicon::{normalize_word, Definition, Entry, Mode};
pub use state::{visited_key, TraversalContext};
