mod common;

use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;

use common::MockIndex;
use topicpool_core::compile::QueryStringCompiler;
use topicpool_core::config::Settings;
use topicpool_core::traits::QueryLog;
use topicpool_core::types::{StructuredQuery, Topic, TopicExtract};
use topicpool_core::Error;
use topicpool_search::{InMemoryQueryLog, SearchRequest, SingleQuerySearch, TopicSearchService};

fn settings(pool_depth: usize) -> Settings {
    let mut s = Settings::default();
    s.topics.pool_depth = pool_depth;
    s
}

fn service(index: &Arc<MockIndex>, log: &Arc<InMemoryQueryLog>, pool_depth: usize) -> TopicSearchService {
    TopicSearchService::new(index.clone(), Arc::new(QueryStringCompiler::new()), log.clone(), settings(pool_depth))
}

fn topic() -> Topic {
    Topic {
        id: "12".to_string(),
        title: "Smith v. Jones".to_string(),
        text: "Duty of care".to_string(),
        extracts: vec![TopicExtract {
            citing_sentence: "No duty was owed.".to_string(),
            citing_paragraph: String::new(),
            queries: vec!["duty AND owed".to_string()],
            compiled_queries: vec![StructuredQuery::try_from(json!({"query": {"query_string": {"query": "duty AND owed"}}})).unwrap()],
        }],
    }
}

#[tokio::test]
async fn single_search_overfetches_and_reports_backend_total() -> anyhow::Result<()> {
    let ids: Vec<String> = (0..30).map(|i| format!("doc{}", i)).collect();
    let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
    let index = Arc::new(MockIndex::new().route("fox", 5000, &refs));
    let search = SingleQuerySearch::new(index.clone(), "decisions", vec!["id".to_string()]);

    let seen: HashSet<String> = (0..10).map(|i| format!("doc{}", i)).collect();
    let pooled = search.run(topicpool_core::normalize::normalize("fox", "html"), &seen, 10).await?;

    assert_eq!(index.received()[0].get("size"), Some(&json!(20)));
    assert_eq!(pooled.total_hits, 5000);
    let got: Vec<&str> = pooled.hits.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(got, vec!["doc10", "doc11", "doc12", "doc13", "doc14", "doc15"]);
    Ok(())
}

#[tokio::test]
async fn single_search_surfaces_backend_errors() {
    let index = Arc::new(MockIndex::new().failing_route("fox", "connection refused", 0));
    let search = SingleQuerySearch::new(index, "decisions", vec![]);
    let err = search.run(topicpool_core::normalize::normalize("fox", "html"), &HashSet::new(), 10).await.unwrap_err();
    assert!(matches!(err, Error::Backend(_)));
}

#[tokio::test]
async fn topic_pool_includes_saved_queries() -> anyhow::Result<()> {
    let index = Arc::new(
        MockIndex::new()
            .route("duty of care", 50, &["d1", "d2"])
            .route("no duty was owed", 30, &["d2", "d3"])
            .route("duty AND owed", 20, &["d3", "d4"])
            .route("negligence", 10, &["d5"]),
    );
    let log = Arc::new(InMemoryQueryLog::new());
    let svc = service(&index, &log, 10);
    svc.search(SearchRequest { query: "negligence".to_string(), topic_id: "12".to_string(), ..Default::default() }, 3)
        .await?;

    let result = svc.topic_pool(&topic(), 3).await?;
    let texts: Vec<&str> = result.stats.iter().map(|s| s.source_text.as_str()).collect();
    assert_eq!(texts, vec!["Duty of care", "No duty was owed.", "duty AND owed", "negligence"]);
    let unique: HashSet<&str> = result.hits.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(unique.len(), result.hits.len());
    assert_eq!(unique, HashSet::from(["d1", "d2", "d3", "d4", "d5"]));

    let other_user = svc.topic_pool(&topic(), 4).await?;
    assert_eq!(other_user.stats.len(), 3, "saved queries are per reviewer");
    Ok(())
}

#[tokio::test]
async fn reviewer_search_is_logged_and_skips_seen() -> anyhow::Result<()> {
    let index = Arc::new(MockIndex::new().route("negligence", 3, &["d1", "d2", "d3"]));
    let log = Arc::new(InMemoryQueryLog::new());
    let svc = service(&index, &log, 10);

    let request = SearchRequest {
        query: "negligence".to_string(),
        topic_id: "12".to_string(),
        fields: vec!["html".to_string()],
        seen_ids: vec!["d2".to_string()],
    };
    let result = svc.search(request, 7).await?;

    assert_eq!(result.stats.len(), 1);
    assert_eq!(result.stats[0].total_hits, 3);
    assert_eq!(result.stats[0].pooled_count, 2);
    let got: Vec<&str> = result.hits.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(got, vec!["d1", "d3"]);
    assert_eq!(log.queries_for("12", 7).await?, vec!["negligence".to_string()]);
    assert_eq!(
        index.received()[0].get("_source"),
        Some(&json!(["id", "case_name", "date_filed", "html"]))
    );
    Ok(())
}

#[tokio::test]
async fn malformed_search_is_still_logged() {
    let index = Arc::new(MockIndex::new());
    let log = Arc::new(InMemoryQueryLog::new());
    let svc = service(&index, &log, 10);
    let request = SearchRequest { query: "(duty".to_string(), topic_id: "12".to_string(), ..Default::default() };
    assert!(matches!(svc.search(request, 1).await, Err(Error::Parse(_))));
    assert_eq!(log.entries_for("12", 1).len(), 1);
    assert!(index.received().is_empty());
}

#[tokio::test]
async fn fetch_decision_parses_source() -> anyhow::Result<()> {
    let index = Arc::new(MockIndex::new().document(
        "4021",
        json!({"case_name": "Smith v. Jones", "date_filed": "1999-01-02", "html": "<p>held</p>"}),
    ));
    let log = Arc::new(InMemoryQueryLog::new());
    let svc = service(&index, &log, 10);

    let decision = svc.fetch_decision("4021").await?;
    assert_eq!(decision.id, "4021");
    assert_eq!(decision.case_name, "Smith v. Jones");
    assert!(matches!(svc.fetch_decision("missing").await, Err(Error::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn doc_list_excludes_and_counts_everything_pooled() -> anyhow::Result<()> {
    let index = Arc::new(
        MockIndex::new()
            .document("a", json!({"case_name": "A"}))
            .document("b", json!({"case_name": "B"}))
            .document("c", json!({"case_name": "C"})),
    );
    let log = Arc::new(InMemoryQueryLog::new());
    let svc = service(&index, &log, 10);

    let ids = vec!["a".to_string(), "b".to_string(), "c".to_string()];
    let result = svc.doc_list(&topic(), &ids, &["b".to_string()]).await?;
    assert_eq!(result.stats[0].source_text, "Duty of care");
    assert_eq!(result.stats[0].total_hits, 2);
    assert_eq!(result.stats[0].pooled_count, 2);
    assert_eq!(index.received()[0].get("size"), Some(&json!(3)));

    let empty = svc.doc_list(&topic(), &[], &[]).await?;
    assert!(empty.hits.is_empty());
    assert_eq!(index.received().len(), 1, "empty id list never reaches the backend");
    Ok(())
}
