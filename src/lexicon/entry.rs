use crate::lexicon::{normalize_word, Mode};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One extracted dictionary entry, persisted as a JSON record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Headword as it appears on the source site
    pub word: String,

    pub mode: Mode,

    /// Senses in page order
    #[serde(default)]
    pub definitions: Vec<Definition>,

    #[serde(default)]
    pub synonyms: Vec<String>,

    #[serde(default)]
    pub antonyms: Vec<String>,

    #[serde(default)]
    pub similar_words: Vec<String>,

    /// Remote pronunciation audio (EN_KH only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound_url: Option<String>,

    /// Path of the downloaded audio, relative to the data directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_sound_path: Option<String>,
}

/// A single sense of an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Definition {
    pub part_of_speech: Option<String>,

    /// Primary gloss: an image reference (EN_KH), Khmer text (KH_KH) or
    /// English text (KH_EN)
    pub text: String,

    pub example: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_image_path: Option<String>,
}

impl Entry {
    /// Creates an empty entry for a headword
    pub fn new(word: impl Into<String>, mode: Mode) -> Self {
        Self {
            word: word.into(),
            mode,
            definitions: Vec::new(),
            synonyms: Vec::new(),
            antonyms: Vec::new(),
            similar_words: Vec::new(),
            sound_url: None,
            local_sound_path: None,
        }
    }

    /// Cache key of this entry within its mode partition
    pub fn key(&self) -> String {
        normalize_word(&self.word)
    }

    /// Related words used as traversal seeds, in synonym, antonym,
    /// similar-word order with duplicates removed
    pub fn related_words(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.synonyms
            .iter()
            .chain(&self.antonyms)
            .chain(&self.similar_words)
            .filter(|w| seen.insert(w.as_str()))
            .cloned()
            .collect()
    }
}

impl Definition {
    /// Returns true if this sense carries no information for `headword`
    ///
    /// A gloss that repeats the headword (any case) is dropped, as is a gloss
    /// shorter than two characters unless an image backs it.
    pub fn is_degenerate(&self, headword: &str) -> bool {
        let text = self.text.trim();
        if text.to_lowercase() == headword.trim().to_lowercase() {
            return true;
        }
        self.image_url.is_none() && text.chars().count() < 2
    }
}
