//! topicpool-elastic
//!
//! [`SearchIndexClient`](topicpool_core::traits::SearchIndexClient) over the
//! Elasticsearch REST API.

pub mod client;
pub mod response;

pub use client::ElasticClient;
