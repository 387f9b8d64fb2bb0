use serde_json::Value;

use topicpool_core::error::{Error, Result};
use topicpool_core::types::{SearchHit, SearchResponse, SourceFields};

/// Reads a `_search` response body.
///
/// `hits.total` is a bare number on older servers and `{"value": n}` on newer
/// ones. A null `_score` (sorted queries) becomes 0.0.
pub fn parse_search_response(body: &Value) -> Result<SearchResponse> {
    let hits = body
        .get("hits")
        .ok_or_else(|| Error::Backend("search response has no 'hits'".to_string()))?;

    let total_hits = match hits.get("total") {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::Object(o)) => o.get("value").and_then(Value::as_u64),
        _ => None,
    }
    .ok_or_else(|| Error::Backend("search response has no readable 'hits.total'".to_string()))?;

    let mut parsed = Vec::new();
    for raw in hits.get("hits").and_then(Value::as_array).map(Vec::as_slice).unwrap_or_default() {
        let id = raw
            .get("_id")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::Backend("hit without '_id'".to_string()))?;
        let score = raw.get("_score").and_then(Value::as_f64).unwrap_or(0.0);
        let fields = raw.get("_source").and_then(Value::as_object).cloned().unwrap_or_default();
        parsed.push(SearchHit { id: id.to_string(), score, fields });
    }
    Ok(SearchResponse { total_hits, hits: parsed })
}

/// Reads a document `GET` response. `found: false` maps to `NotFound`.
pub fn parse_get_response(id: &str, body: &Value) -> Result<SourceFields> {
    if body.get("found").and_then(Value::as_bool) == Some(false) {
        return Err(Error::NotFound(id.to_string()));
    }
    body.get("_source")
        .and_then(Value::as_object)
        .cloned()
        .ok_or_else(|| Error::Backend(format!("document {} has no '_source'", id)))
}

/// Pulls the backend's own reason out of an error body, if it sent one.
pub fn error_reason(body: &Value) -> Option<String> {
    let error = body.get("error")?;
    match error {
        Value::String(s) => Some(s.clone()),
        other => other
            .pointer("/root_cause/0/reason")
            .or_else(|| other.get("reason"))
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}
