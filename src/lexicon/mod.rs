//! Dictionary data model
//!
//! This module defines the three translation modes, the persisted entry
//! types, and the word normalizer that turns a headword into its cache key.

mod entry;
mod mode;
mod normalize;

pub use entry::{Definition, Entry};
pub use mode::{Mode, SearchIndex};
pub use normalize::{normalize_word, EMPTY_KEY};
