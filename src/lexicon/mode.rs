//! Translation directions supported by the source dictionary
//!
//! Each mode has its own detail-page layout, its own search endpoint family
//! and its own storage partition.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Khmer consonants, U+1780 KA through U+17A2 QA
const KHMER_CONSONANTS: std::ops::RangeInclusive<u32> = 0x1780..=0x17A2;

/// Khmer independent vowels, U+17A5 through U+17B3
const KHMER_INDEPENDENT_VOWELS: std::ops::RangeInclusive<u32> = 0x17A5..=0x17B3;

/// Deprecated independent vowel that the search index never returns
const KHMER_DEPRECATED_QUUV: u32 = 0x17A8;

/// A translation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// English headwords with Khmer glosses
    #[serde(rename = "EN_KH", alias = "en-kh")]
    EnKh,

    /// Khmer headwords with Khmer glosses
    #[serde(rename = "KH_KH", alias = "kh-kh")]
    KhKh,

    /// Khmer headwords with English glosses
    #[serde(rename = "KH_EN", alias = "kh-en")]
    KhEn,
}

/// Which search endpoint a mode's prefixes are sent to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchIndex {
    English,
    Khmer,
}

impl Mode {
    /// All modes in batch order
    pub const ALL: [Mode; 3] = [Mode::EnKh, Mode::KhKh, Mode::KhEn];

    /// Canonical name used in records, visited keys and activity events
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EnKh => "EN_KH",
            Self::KhKh => "KH_KH",
            Self::KhEn => "KH_EN",
        }
    }

    /// Directory name of this mode's record partition
    pub fn partition(&self) -> &'static str {
        match self {
            Self::EnKh => "en_kh",
            Self::KhKh => "kh_kh",
            Self::KhEn => "kh_en",
        }
    }

    /// Value of the `mode` query parameter on the detail endpoint
    pub fn detail_code(&self) -> u8 {
        match self {
            Self::EnKh => 1,
            Self::KhKh => 2,
            Self::KhEn => 3,
        }
    }

    pub fn search_index(&self) -> SearchIndex {
        match self {
            Self::EnKh => SearchIndex::English,
            Self::KhKh | Self::KhEn => SearchIndex::Khmer,
        }
    }

    /// Longest prefix ever sent to the discovery endpoint for this mode
    pub fn max_prefix_len(&self) -> usize {
        match self {
            Self::EnKh => 4,
            Self::KhKh | Self::KhEn => 5,
        }
    }

    /// Initial prefixes a batch starts from
    ///
    /// Latin letters for English headwords; Khmer consonants followed by
    /// the independent vowels for the Khmer-indexed modes.
    pub fn seed_alphabet(&self) -> Vec<String> {
        match self.search_index() {
            SearchIndex::English => latin_alphabet(),
            SearchIndex::Khmer => KHMER_CONSONANTS
                .chain(KHMER_INDEPENDENT_VOWELS)
                .filter(|cp| *cp != KHMER_DEPRECATED_QUUV)
                .filter_map(char::from_u32)
                .map(String::from)
                .collect(),
        }
    }

    /// Symbols appended to a prefix when it is expanded one level deeper
    ///
    /// The full Latin alphabet for English prefixes, the seed alphabet for
    /// Khmer prefixes.
    pub fn expansion_alphabet(&self) -> Vec<String> {
        match self.search_index() {
            SearchIndex::English => latin_alphabet(),
            SearchIndex::Khmer => self.seed_alphabet(),
        }
    }

    /// Whether media (images, audio) is extracted for this mode
    pub fn has_media(&self) -> bool {
        matches!(self, Self::EnKh)
    }
}

fn latin_alphabet() -> Vec<String> {
    ('a'..='z').map(String::from).collect()
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "en-kh" => Ok(Self::EnKh),
            "kh-kh" => Ok(Self::KhKh),
            "kh-en" => Ok(Self::KhEn),
            other => Err(format!(
                "unknown mode '{}', expected one of en-kh, kh-kh, kh-en",
                other
            )),
        }
    }
}
