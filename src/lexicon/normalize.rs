use once_cell::sync::Lazy;
use regex::Regex;

/// Key used when a word normalizes to nothing
pub const EMPTY_KEY: &str = "empty";

const SEPARATOR: char = '_';

/// Parenthetical annotations such as a trailing `(archaic)`
static PARENTHETICAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\([^()]*\)").expect("parenthetical pattern is valid"));

/// Normalizes a headword into its cache key
///
/// # Normalization Steps
///
/// 1. Remove parenthetical annotations (`"hello (archaic)"` → `"hello "`)
/// 2. Trim surrounding whitespace
/// 3. Lowercase (Khmer has no case, so Khmer text passes through unchanged)
/// 4. Replace every character outside `a-z`, `0-9` and the Khmer block
///    (U+1780–U+17FF) with `_`
/// 5. Collapse runs of `_` and trim them from both ends
/// 6. Map an empty result to `"empty"`
///
/// The mapping is pure and idempotent: `normalize_word(normalize_word(x)) == normalize_word(x)`.
///
/// # Examples
///
/// ```
/// use dict_ripple::normalize_word;
///
/// assert_eq!(normalize_word("Hello (archaic)"), "hello");
/// assert_eq!(normalize_word("  ice-cream  "), "ice_cream");
/// assert_eq!(normalize_word("???"), "empty");
/// ```
pub fn normalize_word(raw: &str) -> String {
    let stripped = strip_parentheticals(raw);
    let lowered = stripped.trim().to_lowercase();

    let mut key = String::with_capacity(lowered.len());
    for c in lowered.chars() {
        if is_key_char(c) {
            key.push(c);
        } else if !key.ends_with(SEPARATOR) {
            key.push(SEPARATOR);
        }
    }

    let key = key.trim_matches(SEPARATOR);
    if key.is_empty() {
        EMPTY_KEY.to_string()
    } else {
        key.to_string()
    }
}

/// Removes parenthetical groups, innermost first, until none remain
fn strip_parentheticals(raw: &str) -> String {
    let mut current = raw.to_string();
    loop {
        let next = PARENTHETICAL.replace_all(&current, "").into_owned();
        if next == current {
            return next;
        }
        current = next;
    }
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || ('\u{1780}'..='\u{17FF}').contains(&c)
}
