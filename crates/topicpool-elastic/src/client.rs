use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use topicpool_core::config::ElasticSettings;
use topicpool_core::error::{Error, Result};
use topicpool_core::traits::SearchIndexClient;
use topicpool_core::types::{SearchResponse, SourceFields, StructuredQuery};

use crate::response::{error_reason, parse_get_response, parse_search_response};

/// HTTP client for one Elasticsearch cluster.
///
/// Cheap to clone; the underlying connection pool is shared. Requests are
/// not retried.
#[derive(Debug, Clone)]
pub struct ElasticClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl ElasticClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self { http: reqwest::Client::new(), base_url: base_url.trim_end_matches('/').to_string(), timeout }
    }

    pub fn from_settings(settings: &ElasticSettings) -> Self {
        Self::new(&settings.url, Duration::from_secs(settings.timeout_secs))
    }

    pub fn search_url(&self, index: &str) -> String {
        format!("{}/{}/_search", self.base_url, index)
    }

    pub fn document_url(&self, index: &str, doc_type: &str, id: &str) -> String {
        format!("{}/{}/{}/{}", self.base_url, index, doc_type, id)
    }

    async fn read_body(response: reqwest::Response) -> Result<(StatusCode, Value)> {
        let status = response.status();
        let body = response
            .json::<Value>()
            .await
            .map_err(|e| Error::Backend(format!("unreadable response ({}): {}", status, e)))?;
        Ok((status, body))
    }
}

fn transport(e: reqwest::Error) -> Error {
    Error::Backend(format!("transport error: {}", e))
}

fn failed(status: StatusCode, body: &Value) -> Error {
    let reason = error_reason(body).unwrap_or_else(|| body.to_string());
    Error::Backend(format!("{}: {}", status, reason))
}

#[async_trait]
impl SearchIndexClient for ElasticClient {
    async fn search(&self, index: &str, query: &StructuredQuery, scroll: Option<&str>) -> Result<SearchResponse> {
        let mut request = self.http.post(self.search_url(index)).json(query.as_map()).timeout(self.timeout);
        if let Some(keep_alive) = scroll.filter(|s| !s.is_empty()) {
            request = request.query(&[("scroll", keep_alive)]);
        }
        debug!(index, query = %query.to_json(), "search");
        let (status, body) = Self::read_body(request.send().await.map_err(transport)?).await?;
        if !status.is_success() {
            return Err(failed(status, &body));
        }
        parse_search_response(&body)
    }

    async fn get_by_id(&self, index: &str, doc_type: &str, id: &str) -> Result<SourceFields> {
        let url = self.document_url(index, doc_type, id);
        let response = self.http.get(url).timeout(self.timeout).send().await.map_err(transport)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(id.to_string()));
        }
        let (status, body) = Self::read_body(response).await?;
        if !status.is_success() {
            return Err(failed(status, &body));
        }
        parse_get_response(id, &body)
    }
}
