use async_trait::async_trait;
use dashmap::DashMap;

use topicpool_core::error::Result;
use topicpool_core::traits::QueryLog;
use topicpool_core::types::QueryLogEntry;

/// Process-local query log keyed by `(topic_id, user_id)`.
#[derive(Debug, Default)]
pub struct InMemoryQueryLog {
    entries: DashMap<(String, i64), Vec<QueryLogEntry>>,
}

impl InMemoryQueryLog {
    pub fn new() -> Self { Self::default() }

    pub fn entries_for(&self, topic_id: &str, user_id: i64) -> Vec<QueryLogEntry> {
        self.entries.get(&(topic_id.to_string(), user_id)).map(|e| e.value().clone()).unwrap_or_default()
    }
}

#[async_trait]
impl QueryLog for InMemoryQueryLog {
    async fn record(&self, entry: QueryLogEntry) -> Result<()> {
        self.entries.entry((entry.topic_id.clone(), entry.user_id)).or_default().push(entry);
        Ok(())
    }

    async fn queries_for(&self, topic_id: &str, user_id: i64) -> Result<Vec<String>> {
        Ok(self.entries_for(topic_id, user_id).into_iter().map(|e| e.text).collect())
    }
}
