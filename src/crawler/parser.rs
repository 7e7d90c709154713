//! Detail page parser
//!
//! Turns a word's detail page into an [`Entry`]. The three translation modes
//! share the same building blocks but differ in where the definitions live:
//!
//! | Mode | Anchor | Gloss cell |
//! |------|--------|------------|
//! | EN_KH | `Definition:` label | Khmer cell (image if present, else text) |
//! | KH_KH | definition container class | Khmer cell |
//! | KH_EN | `Definition:` label | English cell |
//!
//! Within each definition row the part of speech comes from an italic tag
//! inside a sized `<font>`, and the usage example from a gray Arial `<font>`
//! with its `Ex:` prefix removed. Synonyms, antonyms and similar words are
//! collected from label-anchored link lists.
//!
//! Everything here is pure: no I/O, so pages can be tested from fixtures.

use crate::lexicon::{Definition, Entry, Mode};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Phrases the site shows instead of an entry
const NOT_FOUND_MARKERS: &[&str] = &["word not found", "no result found", "no results found"];

const DEFINITION_LABELS: &[&str] = &["definition:"];
const SYNONYM_LABELS: &[&str] = &["synonym:", "synonyms:"];
const ANTONYM_LABELS: &[&str] = &["antonym:", "antonyms:"];
const SIMILAR_LABELS: &[&str] = &["found similar words:"];

const EXAMPLE_PREFIX: &str = "Ex:";

static KHMER_CELL: Lazy<Selector> = Lazy::new(|| selector("td.khmer"));
static ENGLISH_CELL: Lazy<Selector> = Lazy::new(|| selector("td.english"));
static KHKH_CONTAINER: Lazy<Selector> = Lazy::new(|| selector(".definition_kh"));
static PART_OF_SPEECH: Lazy<Selector> = Lazy::new(|| selector("font[size] i"));
static FONT: Lazy<Selector> = Lazy::new(|| selector("font"));
static IMAGE: Lazy<Selector> = Lazy::new(|| selector("img[src]"));
static LINK: Lazy<Selector> = Lazy::new(|| selector("a"));
static ANY: Lazy<Selector> = Lazy::new(|| selector("*"));

static ORDINAL_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\s+").expect("ordinal pattern is valid"));

/// Audio initialization snippets, most specific first
static AUDIO_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r#"(?i)new\s+Audio\s*\(\s*["']([^"']+)["']"#,
        r#"(?i)(?:sound|audio)\w*\s*[:=]\s*["']([^"']+\.(?:mp3|wav|ogg))["']"#,
    ]
    .iter()
    .map(|p| Regex::new(p).expect("audio pattern is valid"))
    .collect()
});

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

/// Outcome of parsing a detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageContent {
    /// The site explicitly reported that the word does not exist
    NotFound,

    /// Extracted entry (media paths not yet resolved)
    Entry(Entry),
}

/// Parses a detail page for `word` in `mode`
///
/// `page_url` is used to resolve relative image and audio references.
///
/// # Example
///
/// ```
/// use dict_ripple::crawler::{parse_entry_page, PageContent};
/// use dict_ripple::Mode;
/// use url::Url;
///
/// let html = r#"<html><body><p>Word not found</p></body></html>"#;
/// let url = Url::parse("https://dictionary.example/word.php?mode=1&word=zzz").unwrap();
/// assert_eq!(parse_entry_page(html, "zzz", Mode::EnKh, &url), PageContent::NotFound);
/// ```
pub fn parse_entry_page(html: &str, word: &str, mode: Mode, page_url: &Url) -> PageContent {
    if is_not_found(html) {
        return PageContent::NotFound;
    }

    let document = Html::parse_document(html);
    let cell = content_cell(mode);

    let mut entry = Entry::new(word, mode);

    entry.definitions = definition_rows(&document, mode)
        .into_iter()
        .filter_map(|row| parse_definition(row, cell, mode, page_url))
        .filter(|definition| !definition.is_degenerate(word))
        .collect();

    if mode.has_media() {
        entry.sound_url = find_audio_url(html, page_url);
    }

    entry.synonyms = clean_related(labelled_cell_links(&document, SYNONYM_LABELS), word);
    entry.antonyms = clean_related(labelled_cell_links(&document, ANTONYM_LABELS), word);
    entry.similar_words = clean_related(similar_word_links(&document), word);

    PageContent::Entry(entry)
}

/// Returns true if the page carries one of the site's not-found phrases
pub fn is_not_found(html: &str) -> bool {
    let lowered = html.to_lowercase();
    NOT_FOUND_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

fn content_cell(mode: Mode) -> &'static Selector {
    match mode {
        Mode::EnKh | Mode::KhKh => &*KHMER_CELL,
        Mode::KhEn => &*ENGLISH_CELL,
    }
}

/// Selects the definition rows of the page
///
/// The primary row set is every `<tr>` inside the anchor (the KH_KH container
/// or the table holding the `Definition:` label) that holds a content cell.
/// When that set is empty the nearest ancestor of the anchor with content
/// cells supplies the rows instead.
fn definition_rows(document: &Html, mode: Mode) -> Vec<ElementRef<'_>> {
    let cell = content_cell(mode);

    let anchor = match mode {
        Mode::KhKh => document.select(&KHKH_CONTAINER).next(),
        Mode::EnKh | Mode::KhEn => find_label(document, DEFINITION_LABELS)
            .map(|label| closest(label, "table").unwrap_or(label)),
    };
    let Some(anchor) = anchor else {
        return Vec::new();
    };

    let rows = rows_with_cells(anchor, cell);
    if !rows.is_empty() {
        return rows;
    }

    tracing::trace!("No definition rows under anchor, searching its ancestors");
    anchor
        .ancestors()
        .filter_map(ElementRef::wrap)
        .map(|ancestor| rows_with_cells(ancestor, cell))
        .find(|rows| !rows.is_empty())
        .unwrap_or_default()
}

/// Distinct `<tr>` elements inside `scope` that directly own a matching cell
fn rows_with_cells<'a>(scope: ElementRef<'a>, cell: &Selector) -> Vec<ElementRef<'a>> {
    let mut seen = HashSet::new();
    let mut rows = Vec::new();

    for found in scope.select(cell) {
        let Some(row) = closest(found, "tr") else {
            continue;
        };
        let inside_scope = row.id() == scope.id() || row.ancestors().any(|a| a.id() == scope.id());
        if inside_scope && seen.insert(row.id()) {
            rows.push(row);
        }
    }

    rows
}

fn parse_definition(
    row: ElementRef<'_>,
    cell_selector: &Selector,
    mode: Mode,
    page_url: &Url,
) -> Option<Definition> {
    let cell = if cell_selector.matches(&row) {
        row
    } else {
        row.select(cell_selector).next()?
    };

    let part_of_speech = row
        .select(&PART_OF_SPEECH)
        .next()
        .map(collapsed_text)
        .filter(|s| !s.is_empty());

    let example_raw = row
        .select(&FONT)
        .find(|font| is_example_font(*font))
        .map(collapsed_text)
        .filter(|s| !s.is_empty());

    let example = example_raw
        .as_deref()
        .map(strip_example_prefix)
        .filter(|s| !s.is_empty());

    let image_url = if mode.has_media() {
        cell.select(&IMAGE)
            .next()
            .and_then(|img| img.value().attr("src"))
            .and_then(|src| page_url.join(src.trim()).ok())
            .map(String::from)
    } else {
        None
    };

    let text = match &image_url {
        Some(url) => url.clone(),
        None => {
            let mut text = collapsed_text(cell);
            if let Some(raw) = &example_raw {
                text = text.replacen(raw.as_str(), "", 1);
            }
            strip_ordinal(text.trim())
        }
    };

    Some(Definition {
        part_of_speech,
        text,
        example,
        image_url,
        local_image_path: None,
    })
}

/// Gray Arial font tags carry usage examples
fn is_example_font(font: ElementRef<'_>) -> bool {
    let element = font.value();
    let gray = element
        .attr("color")
        .map(|c| matches!(c.trim().to_lowercase().as_str(), "gray" | "grey" | "#808080"))
        .unwrap_or(false);
    let arial = element
        .attr("face")
        .map(|f| f.to_lowercase().contains("arial"))
        .unwrap_or(false);
    gray && arial
}

fn strip_example_prefix(text: &str) -> String {
    let trimmed = text.trim();
    match trimmed.strip_prefix(EXAMPLE_PREFIX) {
        Some(rest) => rest.trim().to_string(),
        None => trimmed.to_string(),
    }
}

/// Removes a leading `"<digits>. "` ordinal
fn strip_ordinal(text: &str) -> String {
    ORDINAL_PREFIX.replace(text, "").trim().to_string()
}

/// Finds the first audio initialization reference in the raw page
fn find_audio_url(html: &str, page_url: &Url) -> Option<String> {
    AUDIO_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(html)
            .and_then(|caps| caps.get(1))
            .and_then(|m| page_url.join(m.as_str().trim()).ok())
            .map(String::from)
    })
}

/// Links in the cell enclosing a label such as `Synonym:`
fn labelled_cell_links(document: &Html, labels: &[&str]) -> Vec<String> {
    let Some(label) = find_label(document, labels) else {
        return Vec::new();
    };
    let scope = closest(label, "td")
        .or_else(|| parent_element(label))
        .unwrap_or(label);
    link_texts(scope)
}

/// Links in the first table following the `Found similar words:` label
fn similar_word_links(document: &Html) -> Vec<String> {
    find_label(document, SIMILAR_LABELS)
        .and_then(next_table)
        .map(link_texts)
        .unwrap_or_default()
}

/// First table following `label` as a sibling of the label or of one of its
/// ancestors, never leaving the label's enclosing cell (or its parent when it
/// has no cell)
fn next_table(label: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let boundary = closest(label, "td").or_else(|| parent_element(label))?;
    let mut current = label;
    loop {
        let found = current
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .find(|sibling| sibling.value().name() == "table");
        if found.is_some() {
            return found;
        }
        let parent = parent_element(current)?;
        if parent.id() == boundary.id() {
            return None;
        }
        current = parent;
    }
}

/// Innermost element whose own text starts with one of `labels`
/// (case-insensitive)
fn find_label<'a>(document: &'a Html, labels: &[&str]) -> Option<ElementRef<'a>> {
    document.select(&ANY).find(|element| {
        let own = own_text(*element).to_lowercase();
        labels.iter().any(|label| own.starts_with(label))
    })
}

fn own_text(element: ElementRef<'_>) -> String {
    element
        .children()
        .filter_map(|child| child.value().as_text())
        .map(|text| &**text)
        .collect::<String>()
        .trim()
        .to_string()
}

fn link_texts(scope: ElementRef<'_>) -> Vec<String> {
    scope
        .select(&LINK)
        .map(collapsed_text)
        .filter(|s| !s.is_empty())
        .collect()
}

fn collapsed_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn closest<'a>(element: ElementRef<'a>, name: &str) -> Option<ElementRef<'a>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| ancestor.value().name() == name)
}

fn parent_element(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.parent().and_then(ElementRef::wrap)
}

/// Drops the headword (any case) and repeated words, keeping first occurrences
pub fn clean_related(words: Vec<String>, headword: &str) -> Vec<String> {
    let headword = headword.trim().to_lowercase();
    let mut seen = HashSet::new();
    words
        .into_iter()
        .map(|w| w.trim().to_string())
        .filter(|w| !w.is_empty())
        .filter(|w| w.to_lowercase() != headword)
        .filter(|w| seen.insert(w.clone()))
        .collect()
}
