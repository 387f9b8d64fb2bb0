//! Domain types shared by the search paths and their collaborators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

pub type DocId = String;
pub type SourceFields = Map<String, Value>;

/// The backend wire form of a search request.
///
/// Opaque apart from the three keys the execution paths own: `_source`,
/// `from` and `size`. Execution takes the query by value, so a submitted
/// fragment cannot be reused by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructuredQuery(Map<String, Value>);

impl StructuredQuery {
    pub fn new() -> Self { Self::default() }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> { self.0.get(key) }

    /// Augments the fragment for execution: fields to retrieve, offset 0, size limit.
    pub fn prepare(&mut self, fields: &[String], size: usize) {
        self.set("_source", fields.to_vec());
        self.set("from", 0);
        self.set("size", size);
    }

    pub fn as_map(&self) -> &Map<String, Value> { &self.0 }

    pub fn to_json(&self) -> String { Value::Object(self.0.clone()).to_string() }
}

impl TryFrom<Value> for StructuredQuery {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(Error::Parse(format!("structured query must be a JSON object, got {}", other))),
        }
    }
}

/// A scored document returned by the backend. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: DocId,
    pub score: f64,
    #[serde(default)]
    pub fields: SourceFields,
}

impl SearchHit {
    pub fn new(id: impl Into<DocId>, score: f64) -> Self {
        Self { id: id.into(), score, fields: Map::new() }
    }
}

/// Hits in relevance order plus the backend's total match count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub total_hits: u64,
    pub hits: Vec<SearchHit>,
}

/// Per-query statistics, one per input query and in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryStat {
    pub source_text: String,
    pub total_hits: u64,
    pub pooled_count: usize,
}

/// Pooled result of one or more queries.
///
/// `stats` follows input order. `hits` holds each document at most once and
/// carries no cross-query ordering guarantee.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregationResult {
    pub stats: Vec<QueryStat>,
    pub hits: Vec<SearchHit>,
}

impl AggregationResult {
    pub fn single(source_text: impl Into<String>, total_hits: u64, hits: Vec<SearchHit>) -> Self {
        let stat = QueryStat { source_text: source_text.into(), total_hits, pooled_count: hits.len() };
        Self { stats: vec![stat], hits }
    }
}

/// A structured query paired with the text it was derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledQuery {
    pub text: String,
    pub query: StructuredQuery,
}

impl LabeledQuery {
    pub fn new(text: impl Into<String>, query: StructuredQuery) -> Self {
        Self { text: text.into(), query }
    }
}

/// A court decision as stored in the index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub id: String,
    pub case_name: String,
    pub date_filed: String,
    pub html: String,
}

impl TryFrom<&SourceFields> for Decision {
    type Error = Error;

    fn try_from(source: &SourceFields) -> Result<Self> {
        let mut decision = Decision::default();
        for (key, value) in source {
            match key.as_str() {
                "id" => decision.id = id_from_value(value)?,
                "case_name" => decision.case_name = string_field(key, value)?,
                "date_filed" => decision.date_filed = string_field(key, value)?,
                "html" => decision.html = string_field(key, value)?,
                _ => {}
            }
        }
        Ok(decision)
    }
}

fn id_from_value(value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(match (n.as_u64(), n.as_i64()) {
            (Some(u), _) => u.to_string(),
            (None, Some(i)) => i.to_string(),
            _ => n.to_string(),
        }),
        other => Err(Error::Parse(format!("could not read id from {}", other))),
    }
}

fn string_field(key: &str, value: &Value) -> Result<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| Error::Parse(format!("could not read '{}' as a string", key)))
}

/// One passage of a topic that yields its own search expressions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicExtract {
    #[serde(default)]
    pub citing_sentence: String,
    #[serde(default)]
    pub citing_paragraph: String,
    /// Query-language strings, paired by position with `compiled_queries`.
    #[serde(default)]
    pub queries: Vec<String>,
    #[serde(default)]
    pub compiled_queries: Vec<StructuredQuery>,
}

/// A unit of research interest reviewed by one or more assessors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub text: String,
    #[serde(default)]
    pub extracts: Vec<TopicExtract>,
}

/// A raw query string submitted by a reviewer against a topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryLogEntry {
    pub topic_id: String,
    pub user_id: i64,
    pub text: String,
    pub submitted_at: DateTime<Utc>,
}
