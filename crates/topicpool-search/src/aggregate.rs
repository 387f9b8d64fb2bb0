//! Concurrent multi-query pooling.
//!
//! One task per input query, all sharing a fresh [`SeenSet`]. Each task's
//! outcome lands in its own slot (the task handle), so input order is restored
//! after the join regardless of completion order. Every task runs to
//! completion; if any failed, the whole call fails and successful work is
//! discarded.

use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};

use topicpool_core::error::{Error, Result};
use topicpool_core::traits::SearchIndexClient;
use topicpool_core::types::{AggregationResult, LabeledQuery, QueryStat, SearchHit, StructuredQuery};

use crate::seen::SeenSet;

#[derive(Debug)]
struct WorkerOutcome {
    total_hits: u64,
    hits: Vec<SearchHit>,
}

pub struct MultiQueryAggregator {
    client: Arc<dyn SearchIndexClient>,
    index: Arc<str>,
    fields: Arc<[String]>,
}

impl MultiQueryAggregator {
    pub fn new(client: Arc<dyn SearchIndexClient>, index: &str, fields: Vec<String>) -> Self {
        Self { client, index: Arc::from(index), fields: Arc::from(fields) }
    }

    pub async fn run_all(&self, queries: Vec<LabeledQuery>, pool_depth: usize) -> Result<AggregationResult> {
        let seen = SeenSet::new();
        let mut texts = Vec::with_capacity(queries.len());
        let mut handles = Vec::with_capacity(queries.len());

        for (slot, LabeledQuery { text, query }) in queries.into_iter().enumerate() {
            texts.push(text);
            let client = Arc::clone(&self.client);
            let index = Arc::clone(&self.index);
            let fields = Arc::clone(&self.fields);
            let seen = seen.clone();
            handles.push(tokio::spawn(async move {
                pool_worker(slot, client.as_ref(), &index, &fields, query, pool_depth, &seen).await
            }));
        }

        let slots = join_all(handles).await;

        let mut first_error = None;
        let mut outcomes = Vec::with_capacity(slots.len());
        for (slot, joined) in slots.into_iter().enumerate() {
            let outcome = match joined {
                Ok(outcome) => outcome,
                Err(e) => Err(Error::Backend(format!("query worker aborted: {}", e))),
            };
            match outcome {
                Ok(o) => outcomes.push(o),
                Err(e) => {
                    warn!(slot, error = %e, "pooled query failed");
                    if first_error.is_none() {
                        first_error = Some(Error::aggregation(slot, e));
                    }
                }
            }
        }
        if let Some(e) = first_error {
            return Err(e);
        }

        let mut result = AggregationResult::default();
        for (source_text, outcome) in texts.into_iter().zip(outcomes) {
            result.stats.push(QueryStat { source_text, total_hits: outcome.total_hits, pooled_count: outcome.hits.len() });
            result.hits.extend(outcome.hits);
        }
        info!(queries = result.stats.len(), pooled = result.hits.len(), "topic queries pooled");
        Ok(result)
    }
}

async fn pool_worker(
    slot: usize,
    client: &dyn SearchIndexClient,
    index: &str,
    fields: &[String],
    mut query: StructuredQuery,
    pool_depth: usize,
    seen: &SeenSet,
) -> Result<WorkerOutcome> {
    query.prepare(fields, pool_depth);
    let response = client.search(index, &query, None).await?;
    let hits: Vec<SearchHit> = response.hits.into_iter().filter(|h| seen.insert_if_absent(&h.id)).collect();
    debug!(slot, total = response.total_hits, contributed = hits.len(), "query worker finished");
    Ok(WorkerOutcome { total_hits: response.total_hits, hits })
}
