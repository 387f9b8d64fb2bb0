//! Free text to match query.
//!
//! Used for topic text and citing passages, which are prose rather than
//! query-language input.

use regex::Regex;
use serde_json::json;
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::types::StructuredQuery;

static NON_ALNUM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9]+").expect("valid regex"));
static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").expect("valid regex"));

/// Builds `{"query": {"match": {field: text}}}` from cleaned text with its
/// distinct numbers appended, so case and docket numbers weigh in twice.
///
/// Never fails. Empty input produces an empty match string; callers that
/// must not send such a query should check the text first.
pub fn normalize(text: &str, field: &str) -> StructuredQuery {
    let numbers = numeric_tokens(text);
    let cleaned = clean_text(text);
    let combined = format!("{} {}", cleaned, numbers);
    match_query(combined.trim(), field)
}

/// Runs of characters outside `[A-Za-z0-9]` become one space, then lowercase.
pub fn clean_text(text: &str) -> String {
    NON_ALNUM.replace_all(text, " ").to_lowercase()
}

/// Maximal digit runs in order of first appearance, duplicates dropped.
pub fn numeric_tokens(text: &str) -> String {
    let mut seen = HashSet::new();
    DIGITS
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|n| seen.insert(*n))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn match_query(text: &str, field: &str) -> StructuredQuery {
    let mut query = StructuredQuery::new();
    query.set("query", json!({ "match": { field: text } }));
    query
}
