use async_trait::async_trait;

use crate::error::Result;
use crate::types::{QueryLogEntry, SearchResponse, SourceFields, StructuredQuery};

/// Executes structured queries against a search index.
///
/// Implementations are shared across concurrent workers and must not hold
/// per-call state.
#[async_trait]
pub trait SearchIndexClient: Send + Sync {
    /// Runs `query` against `index`. `scroll` is an optional scroll keep-alive.
    async fn search(&self, index: &str, query: &StructuredQuery, scroll: Option<&str>) -> Result<SearchResponse>;

    /// Fetches the stored source of one document. Fails with `NotFound` when absent.
    async fn get_by_id(&self, index: &str, doc_type: &str, id: &str) -> Result<SourceFields>;
}

/// Switches forwarded to the query-language compiler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// Terms without an explicit operator are AND-ed rather than OR-ed.
    pub conjunctive: bool,
    /// Ignore type mismatches on fields instead of failing the query.
    pub lenient: bool,
}

/// Turns query-language text into a structured query fragment.
pub trait QueryCompiler: Send + Sync {
    fn compile(
        &self,
        text: &str,
        content_field: &str,
        allowed_fields: &[String],
        options: CompileOptions,
    ) -> Result<StructuredQuery>;
}

/// Persists the raw text of submitted queries per topic and reviewer.
#[async_trait]
pub trait QueryLog: Send + Sync {
    async fn record(&self, entry: QueryLogEntry) -> Result<()>;
    async fn queries_for(&self, topic_id: &str, user_id: i64) -> Result<Vec<String>>;
}
