use serde_json::json;
use std::sync::Arc;
use tracing::debug;

use topicpool_core::error::Result;
use topicpool_core::traits::SearchIndexClient;
use topicpool_core::types::{AggregationResult, StructuredQuery};

/// Restricts a search to `ids`, minus anything in `exclude`.
pub fn doc_list_query(ids: &[String], exclude: &[String]) -> StructuredQuery {
    let mut query = StructuredQuery::new();
    query.set(
        "query",
        json!({
            "bool": {
                "filter": { "ids": { "values": ids } },
                "must_not": { "ids": { "values": exclude } },
            }
        }),
    );
    query
}

/// Pools a fixed list of documents chosen for a topic ahead of time.
pub struct DocListSearch {
    client: Arc<dyn SearchIndexClient>,
    index: String,
    fields: Vec<String>,
}

impl DocListSearch {
    pub fn new(client: Arc<dyn SearchIndexClient>, index: impl Into<String>, fields: Vec<String>) -> Self {
        Self { client, index: index.into(), fields }
    }

    /// Every returned document counts as both matched and pooled.
    pub async fn run(&self, label: &str, ids: &[String], exclude: &[String]) -> Result<AggregationResult> {
        if ids.is_empty() {
            return Ok(AggregationResult::single(label, 0, Vec::new()));
        }
        let mut query = doc_list_query(ids, exclude);
        query.prepare(&self.fields, ids.len());
        let response = self.client.search(&self.index, &query, None).await?;
        debug!(requested = ids.len(), excluded = exclude.len(), found = response.hits.len(), "doc list fetched");
        Ok(AggregationResult::single(label, response.hits.len() as u64, response.hits))
    }
}
