//! Deterministic text cleaning: strip markup, URLs and non-letters, then
//! lowercase, drop stop words and lemmatize.

use std::sync::LazyLock;

use regex::Regex;

use super::{LemmaTable, is_stop_word, lemmatize};

/// HTML-tag-like spans, URLs, and every character that is neither an ASCII
/// letter nor whitespace. One pass, left to right.
static STRIP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<.*?>|(?i:http\S*)|[^a-zA-Z\s]").expect("strip pattern is valid")
});

/// Normalize raw message text into the token stream the vectorizer expects.
///
/// Pure and total: degenerate input (all markup, all punctuation) yields an
/// empty string.
pub fn normalize(raw: &str) -> String {
    normalize_by(raw, lemmatize)
}

/// [`normalize`], consulting recorded lemmas before the suffix rules.
pub fn normalize_with(raw: &str, lemmas: &LemmaTable) -> String {
    normalize_by(raw, |token| lemmas.lemmatize(token))
}

fn normalize_by(raw: &str, lemma: impl Fn(&str) -> String) -> String {
    let stripped = STRIP.replace_all(raw, "");
    let lowered = stripped.to_lowercase();

    lowered
        .split_whitespace()
        .filter(|token| !is_stop_word(token))
        .map(lemma)
        .collect::<Vec<_>>()
        .join(" ")
}
