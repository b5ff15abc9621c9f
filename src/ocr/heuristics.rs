//! Content heuristics for recognized question text.
//!
//! Cheap, local checks that decide whether a recognition attempt produced a
//! complete-looking question or whether a larger crop is worth trying.

use regex::Regex;
use std::sync::OnceLock;

fn whitespace_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static regex"))
}

/// Returns true if `text` looks like a whole question.
///
/// After collapsing whitespace the text must be non-empty, at least
/// `min_chars` characters long, and must not end on an unterminated `$$`.
pub fn looks_valid_ocr_text(text: &str, min_chars: usize) -> bool {
    let clean = whitespace_run().replace_all(text, " ");
    let clean = clean.trim();
    if clean.is_empty() || clean.chars().count() < min_chars {
        return false;
    }
    !clean.ends_with("$$")
}

/// First `max_chars` characters of `text`, on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
