#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use topicpool_core::error::{Error, Result};
use topicpool_core::traits::SearchIndexClient;
use topicpool_core::types::{SearchHit, SearchResponse, SourceFields, StructuredQuery};

enum Route {
    Hits { total: u64, hits: Vec<SearchHit>, delay: Duration },
    Fail { message: String, delay: Duration },
    Panic { message: String },
}

/// Canned backend keyed by the query text found in a match or query_string clause.
#[derive(Default)]
pub struct MockIndex {
    routes: HashMap<String, Route>,
    documents: Vec<(String, SourceFields)>,
    pub received: Mutex<Vec<StructuredQuery>>,
    pub completed: AtomicUsize,
}

impl MockIndex {
    pub fn new() -> Self { Self::default() }

    pub fn route(mut self, key: &str, total: u64, ids: &[&str]) -> Self {
        self.routes.insert(key.to_string(), Route::Hits { total, hits: scored(ids), delay: Duration::ZERO });
        self
    }

    pub fn delayed_route(mut self, key: &str, total: u64, ids: &[&str], delay_ms: u64) -> Self {
        self.routes.insert(key.to_string(), Route::Hits { total, hits: scored(ids), delay: Duration::from_millis(delay_ms) });
        self
    }

    pub fn failing_route(mut self, key: &str, message: &str, delay_ms: u64) -> Self {
        self.routes.insert(key.to_string(), Route::Fail { message: message.to_string(), delay: Duration::from_millis(delay_ms) });
        self
    }

    /// A route whose worker panics instead of answering.
    pub fn panicking_route(mut self, key: &str, message: &str) -> Self {
        self.routes.insert(key.to_string(), Route::Panic { message: message.to_string() });
        self
    }

    pub fn document(mut self, id: &str, source: Value) -> Self {
        let fields = source.as_object().cloned().unwrap_or_default();
        self.documents.push((id.to_string(), fields));
        self
    }

    pub fn completed(&self) -> usize { self.completed.load(Ordering::SeqCst) }

    pub fn received(&self) -> Vec<StructuredQuery> { self.received.lock().unwrap().clone() }

    fn id_list_search(&self, clause: &Value) -> Option<SearchResponse> {
        let ids = clause.pointer("/bool/filter/ids/values")?.as_array()?;
        let exclude = clause.pointer("/bool/must_not/ids/values").and_then(Value::as_array).cloned().unwrap_or_default();
        let hits: Vec<SearchHit> = self
            .documents
            .iter()
            .filter(|(id, _)| ids.iter().any(|v| v == id.as_str()) && !exclude.iter().any(|v| v == id.as_str()))
            .map(|(id, source)| SearchHit { id: id.clone(), score: 0.0, fields: source.clone() })
            .collect();
        Some(SearchResponse { total_hits: hits.len() as u64, hits })
    }
}

pub fn scored(ids: &[&str]) -> Vec<SearchHit> {
    ids.iter().enumerate().map(|(i, id)| SearchHit::new(*id, 10.0 - i as f64)).collect()
}

pub fn query_key(query: &StructuredQuery) -> Option<String> {
    let clause = query.get("query")?;
    if let Some(m) = clause.get("match").and_then(Value::as_object) {
        return m.values().next().and_then(Value::as_str).map(str::to_string);
    }
    clause.pointer("/query_string/query").and_then(Value::as_str).map(str::to_string)
}

#[async_trait]
impl SearchIndexClient for MockIndex {
    async fn search(&self, _index: &str, query: &StructuredQuery, _scroll: Option<&str>) -> Result<SearchResponse> {
        self.received.lock().unwrap().push(query.clone());
        let size = query.get("size").and_then(Value::as_u64).map(|s| s as usize).unwrap_or(usize::MAX);

        if let Some(clause) = query.get("query") {
            if let Some(mut response) = self.id_list_search(clause) {
                response.hits.truncate(size);
                self.completed.fetch_add(1, Ordering::SeqCst);
                return Ok(response);
            }
        }

        let key = query_key(query).unwrap_or_default();
        let outcome = match self.routes.get(&key) {
            Some(Route::Hits { total, hits, delay }) => {
                tokio::time::sleep(*delay).await;
                let mut hits = hits.clone();
                hits.truncate(size);
                Ok(SearchResponse { total_hits: *total, hits })
            }
            Some(Route::Fail { message, delay }) => {
                tokio::time::sleep(*delay).await;
                Err(Error::Backend(message.clone()))
            }
            Some(Route::Panic { message }) => panic!("{}", message),
            None => Ok(SearchResponse::default()),
        };
        self.completed.fetch_add(1, Ordering::SeqCst);
        outcome
    }

    async fn get_by_id(&self, _index: &str, _doc_type: &str, id: &str) -> Result<SourceFields> {
        self.documents
            .iter()
            .find(|(doc_id, _)| doc_id == id)
            .map(|(_, source)| source.clone())
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }
}
