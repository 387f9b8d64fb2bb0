use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

use topicpool_core::config::Settings;
use topicpool_core::error::Result;
use topicpool_core::traits::{QueryCompiler, QueryLog, SearchIndexClient};
use topicpool_core::types::{AggregationResult, Decision, QueryLogEntry, Topic};

use crate::aggregate::MultiQueryAggregator;
use crate::doc_list::DocListSearch;
use crate::plan::{TopicQueryPlanner, REVIEWER_COMPILE_OPTIONS};
use crate::single::SingleQuerySearch;

/// An ad-hoc query typed by a reviewer while working on a topic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub topic_id: String,
    /// Fields the query language may address; empty means the content field only.
    #[serde(default)]
    pub fields: Vec<String>,
    /// Documents the reviewer already has in their pool.
    #[serde(default)]
    pub seen_ids: Vec<String>,
}

/// Entry point for the review tool's request handlers.
pub struct TopicSearchService {
    client: Arc<dyn SearchIndexClient>,
    compiler: Arc<dyn QueryCompiler>,
    log: Arc<dyn QueryLog>,
    settings: Settings,
}

impl TopicSearchService {
    pub fn new(
        client: Arc<dyn SearchIndexClient>,
        compiler: Arc<dyn QueryCompiler>,
        log: Arc<dyn QueryLog>,
        settings: Settings,
    ) -> Self {
        Self { client, compiler, log, settings }
    }

    pub fn settings(&self) -> &Settings { &self.settings }

    /// Pools every query associated with `topic` for one reviewer.
    pub async fn topic_pool(&self, topic: &Topic, user_id: i64) -> Result<AggregationResult> {
        let saved = self.log.queries_for(&topic.id, user_id).await?;
        let planner = TopicQueryPlanner::new(&self.settings.search.content_field);
        let queries = planner.plan(topic, &saved, self.compiler.as_ref())?;
        info!(topic = %topic.id, user_id, queries = queries.len(), "pooling topic");
        let aggregator = MultiQueryAggregator::new(
            Arc::clone(&self.client),
            &self.settings.elastic.index_name,
            self.settings.search.pool_fields.clone(),
        );
        aggregator.run_all(queries, self.settings.topics.pool_depth).await
    }

    /// Logs, compiles and runs a reviewer query. The query text is logged
    /// even when it later fails to compile.
    pub async fn search(&self, request: SearchRequest, user_id: i64) -> Result<AggregationResult> {
        self.log
            .record(QueryLogEntry {
                topic_id: request.topic_id.clone(),
                user_id,
                text: request.query.clone(),
                submitted_at: Utc::now(),
            })
            .await?;
        info!(topic = %request.topic_id, user_id, query = %request.query, "reviewer search");

        let query = self.compiler.compile(
            &request.query,
            &self.settings.search.content_field,
            &request.fields,
            REVIEWER_COMPILE_OPTIONS,
        )?;
        let seen: HashSet<String> = request.seen_ids.into_iter().collect();
        let single = SingleQuerySearch::new(
            Arc::clone(&self.client),
            self.settings.elastic.index_name.clone(),
            self.settings.search.result_fields.clone(),
        );
        let pooled = single.run(query, &seen, self.settings.topics.pool_depth).await?;
        Ok(AggregationResult::single(request.query, pooled.total_hits, pooled.hits))
    }

    pub async fn fetch_decision(&self, id: &str) -> Result<Decision> {
        let elastic = &self.settings.elastic;
        let source = self.client.get_by_id(&elastic.index_name, &elastic.doc_type, id).await?;
        let mut decision = Decision::try_from(&source)?;
        if decision.id.is_empty() {
            decision.id = id.to_string();
        }
        Ok(decision)
    }

    /// Pools the documents preselected for `topic`, labelled with its text.
    pub async fn doc_list(&self, topic: &Topic, ids: &[String], exclude: &[String]) -> Result<AggregationResult> {
        let search = DocListSearch::new(
            Arc::clone(&self.client),
            self.settings.elastic.index_name.clone(),
            self.settings.search.result_fields.clone(),
        );
        search.run(&topic.text, ids, exclude).await
    }
}
