//! topicpool-search
//!
//! Pooling search paths over a [`SearchIndexClient`](topicpool_core::traits::SearchIndexClient):
//! a single reviewer query with overflow pooling, a concurrent multi-query
//! aggregator with global deduplication, and the topic-level service that
//! composes them.

pub mod aggregate;
pub mod doc_list;
pub mod plan;
pub mod query_log;
pub mod seen;
pub mod service;
pub mod single;

pub use aggregate::MultiQueryAggregator;
pub use doc_list::DocListSearch;
pub use plan::TopicQueryPlanner;
pub use query_log::InMemoryQueryLog;
pub use seen::SeenSet;
pub use service::{SearchRequest, TopicSearchService};
pub use single::{PooledSearch, SingleQuerySearch};
