//! Permissive JSON-object extraction from model replies.
//!
//! Replies may wrap the object in prose, markdown fences, or log lines.
//! Extraction is an ordered chain; each step either yields an object or
//! hands over to the next:
//!
//! 1. [`strip_code_fences`] removes fence markers (always applied)
//! 2. [`first_json_line`] takes the first line that is a JSON object
//! 3. [`brace_search`] looks for a `{...}` span anywhere in the text

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

/// A parsed JSON object.
pub type JsonObject = Map<String, Value>;

/// Fence markers with an optional language tag (```` ```json ````, ```` ``` ````).
static FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```[A-Za-z0-9_-]*").expect("fence pattern is valid"));

/// First `{` to last `}`, across lines.
static WIDEST_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("span pattern is valid"));

/// Innermost, non-nested `{...}` spans.
static FLAT_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^{}]*\}").expect("span pattern is valid"));

/// Remove markdown code-fence markers, keeping the fenced content.
pub fn strip_code_fences(text: &str) -> String {
    FENCE.replace_all(text, "").into_owned()
}

/// The first non-blank line that parses as a JSON object.
pub fn first_json_line(text: &str) -> Option<JsonObject> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .find_map(parse_object)
}

/// A brace-delimited object anywhere in `text`.
///
/// Tries the widest span first so multi-line objects survive, then each
/// flat span in order of appearance.
pub fn brace_search(text: &str) -> Option<JsonObject> {
    if let Some(span) = WIDEST_SPAN.find(text)
        && let Some(object) = parse_object(span.as_str())
    {
        return Some(object);
    }

    FLAT_SPAN
        .find_iter(text)
        .find_map(|span| parse_object(span.as_str()))
}

/// Run the full chain.
pub fn extract_json_object(text: &str) -> Option<JsonObject> {
    let cleaned = strip_code_fences(text);
    first_json_line(&cleaned).or_else(|| brace_search(&cleaned))
}

/// Numeric `confidence` within [0, 1], if present.
pub fn read_confidence(object: &JsonObject) -> Option<f64> {
    object
        .get("confidence")
        .and_then(Value::as_f64)
        .filter(|c| c.is_finite() && (0.0..=1.0).contains(c))
}

fn parse_object(candidate: &str) -> Option<JsonObject> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(object)) => Some(object),
        _ => None,
    }
}
