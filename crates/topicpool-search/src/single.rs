use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use topicpool_core::error::Result;
use topicpool_core::traits::SearchIndexClient;
use topicpool_core::types::{DocId, SearchHit, StructuredQuery};

/// Once the walk is past the pool depth, stop as soon as more than this many
/// new hits have been accepted.
pub const OVERFLOW_ACCEPTED_LIMIT: usize = 5;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PooledSearch {
    pub hits: Vec<SearchHit>,
    /// Backend-reported matches for the query, not the pooled count.
    pub total_hits: u64,
}

/// Runs one reviewer query, skipping documents the reviewer already has.
pub struct SingleQuerySearch {
    client: Arc<dyn SearchIndexClient>,
    index: String,
    fields: Vec<String>,
}

impl SingleQuerySearch {
    pub fn new(client: Arc<dyn SearchIndexClient>, index: impl Into<String>, fields: Vec<String>) -> Self {
        Self { client, index: index.into(), fields }
    }

    pub async fn run(
        &self,
        mut query: StructuredQuery,
        already_seen: &HashSet<DocId>,
        pool_depth: usize,
    ) -> Result<PooledSearch> {
        query.prepare(&self.fields, overfetch_size(pool_depth));
        let response = self.client.search(&self.index, &query, None).await?;
        let fetched = response.hits.len();
        let hits = pool_hits(response.hits, already_seen, pool_depth);
        debug!(fetched, pooled = hits.len(), total = response.total_hits, "single query pooled");
        Ok(PooledSearch { hits, total_hits: response.total_hits })
    }
}

/// Request size for one pooled query: twice the depth, so the overflow walk
/// has a tail to draw from.
pub fn overfetch_size(pool_depth: usize) -> usize {
    pool_depth.saturating_mul(2)
}

/// Walks `hits` in relevance order and keeps up to `pool_depth` unseen ones.
///
/// When the top `pool_depth` results are mostly already seen, the walk keeps
/// going into the overfetched tail until more than
/// [`OVERFLOW_ACCEPTED_LIMIT`] new hits are found.
pub fn pool_hits(hits: Vec<SearchHit>, already_seen: &HashSet<DocId>, pool_depth: usize) -> Vec<SearchHit> {
    let mut accepted = Vec::new();
    if pool_depth == 0 {
        return accepted;
    }
    let mut taken: HashSet<DocId> = HashSet::new();
    for (j, hit) in hits.into_iter().enumerate() {
        if !already_seen.contains(&hit.id) && taken.insert(hit.id.clone()) {
            accepted.push(hit);
        }
        if accepted.len() >= pool_depth {
            break;
        }
        if j >= pool_depth && accepted.len() > OVERFLOW_ACCEPTED_LIMIT {
            break;
        }
    }
    accepted
}
