//! Elasticsearch backend client.
//!
//! Thin wrapper around `reqwest` that serializes a compiled
//! [`SearchRequest`] into the backend search body and issues it against the
//! configured index. Also exposes the cluster-health call backing
//! `/healthcheck`. No retries: a failed call surfaces as a
//! [`BackendError`] and the request is over.

use reqwest::StatusCode;
use serde_json::{Value, json};
use thiserror::Error;

use crate::config::ApiConfig;
use crate::query::{Aggregation, QueryClause, SearchRequest};

/// Failures talking to the search backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend returned {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// Elasticsearch HTTP client bound to a single index.
#[derive(Debug, Clone)]
pub struct EsClient {
    http: reqwest::Client,
    base_url: String,
    index: String,
}

impl EsClient {
    /// Build a client from configuration. The configured search timeout
    /// bounds every call; it does not abort the query on the backend side.
    pub fn new(config: &ApiConfig) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(config.search_timeout())
            .build()?;
        Ok(Self {
            http,
            base_url: config.backend_url(),
            index: config.index.clone(),
        })
    }

    /// The index this client searches.
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Execute a compiled search request and return the raw backend
    /// response body.
    pub async fn search(&self, request: &SearchRequest) -> Result<Value, BackendError> {
        let url = format!("{}/{}/_search", self.base_url, self.index);
        let body = search_body(request);
        tracing::info!(query = %body, "elasticsearch query");

        let mut builder = self.http.post(&url).json(&body);
        if let Some(page) = request.pagination {
            builder = builder.query(&[("from", page.from), ("size", page.size)]);
        }

        let response = builder.send().await?;
        Self::into_json(response).await
    }

    /// Cluster health for the bound index, waiting for at least yellow.
    pub async fn cluster_health(&self) -> Result<Value, BackendError> {
        let url = format!("{}/_cluster/health/{}", self.base_url, self.index);
        let response = self
            .http
            .get(&url)
            .query(&[("wait_for_status", "yellow"), ("timeout", "60s")])
            .send()
            .await?;
        Self::into_json(response).await
    }

    async fn into_json(response: reqwest::Response) -> Result<Value, BackendError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status { status, body });
        }
        Ok(response.json().await?)
    }
}

/// Serialize a [`SearchRequest`] into the backend search body.
///
/// Facets are keyed `count`; the response formatter reads them back under
/// `facets.count`.
fn search_body(request: &SearchRequest) -> Value {
    let query = match &request.query {
        QueryClause::MatchAll => json!({ "match_all": {} }),
        QueryClause::QueryString(q) => json!({ "query_string": { "query": q } }),
    };

    let mut body = serde_json::Map::new();
    body.insert("query".into(), query);

    if let Some(aggregation) = &request.aggregation {
        let facet = match aggregation {
            Aggregation::Terms { field, size } => json!({
                "terms": { "fields": [field], "size": size }
            }),
            Aggregation::DateHistogram { field } => json!({
                "date_histogram": { "field": field, "interval": "day", "order": "time" }
            }),
        };
        body.insert("facets".into(), json!({ "count": facet }));
    }

    Value::Object(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Pagination;

    #[test]
    fn match_all_body() {
        let request = SearchRequest {
            query: QueryClause::MatchAll,
            aggregation: None,
            pagination: Some(Pagination { from: 0, size: 1 }),
        };
        assert_eq!(search_body(&request), json!({ "query": { "match_all": {} } }));
    }

    #[test]
    fn query_string_body() {
        let request = SearchRequest {
            query: QueryClause::QueryString("status:active".into()),
            aggregation: None,
            pagination: Some(Pagination { from: 10, size: 25 }),
        };
        assert_eq!(
            search_body(&request),
            json!({ "query": { "query_string": { "query": "status:active" } } })
        );
    }

    #[test]
    fn terms_facet_body() {
        let request = SearchRequest {
            query: QueryClause::MatchAll,
            aggregation: Some(Aggregation::Terms {
                field: "status".into(),
                size: 5,
            }),
            pagination: None,
        };
        assert_eq!(
            search_body(&request),
            json!({
                "query": { "match_all": {} },
                "facets": { "count": { "terms": { "fields": ["status"], "size": 5 } } }
            })
        );
    }

    #[test]
    fn date_histogram_facet_body() {
        let request = SearchRequest {
            query: QueryClause::MatchAll,
            aggregation: Some(Aggregation::DateHistogram {
                field: "report_date".into(),
            }),
            pagination: None,
        };
        assert_eq!(
            search_body(&request),
            json!({
                "query": { "match_all": {} },
                "facets": {
                    "count": {
                        "date_histogram": {
                            "field": "report_date",
                            "interval": "day",
                            "order": "time"
                        }
                    }
                }
            })
        );
    }
}
