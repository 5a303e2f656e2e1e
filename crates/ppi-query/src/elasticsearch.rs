//! Elasticsearch implementation of [`SearchIndex`] over its REST API.
use async_trait::async_trait;
use ppi_core::{PpiError, Result, TweetDocument};
use reqwest::{Client as HttpClient, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;

use crate::index::{BulkStats, IndexMapping, SearchIndex};
use crate::query::AggregationQuery;
use crate::response::SearchResponse;

pub struct ElasticsearchClient {
    base_url: String,
    http: HttpClient,
}

impl ElasticsearchClient {
    pub fn new(host: &str, timeout: Duration) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PpiError::Transport(e.to_string()))?;
        Ok(Self {
            base_url: host.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn transport(e: reqwest::Error) -> PpiError {
    PpiError::Transport(e.to_string())
}

/// Body-read failures stay transport errors; bodies that arrive but do not
/// decode are shape errors.
fn decode(e: reqwest::Error) -> PpiError {
    if e.is_decode() {
        PpiError::ResponseShape(e.to_string())
    } else {
        transport(e)
    }
}

/// Passes successful responses through and turns everything else into
/// `PpiError::Service` carrying the body the server sent.
async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(PpiError::Service {
        status: status.as_u16(),
        body,
    })
}

/// NDJSON body for `_bulk`: an action line then the source line, per document.
pub fn bulk_body(index: &str, documents: &[TweetDocument]) -> Result<String> {
    let mut body = String::new();
    for doc in documents {
        let action = json!({ "index": { "_index": index, "_id": doc.id } });
        body.push_str(&serde_json::to_string(&action)?);
        body.push('\n');
        body.push_str(&serde_json::to_string(doc)?);
        body.push('\n');
    }
    Ok(body)
}

#[derive(Debug, Deserialize)]
struct BulkResponse {
    #[serde(default)]
    items: Vec<HashMap<String, BulkItem>>,
}

#[derive(Debug, Deserialize)]
struct BulkItem {
    status: u16,
}

impl BulkResponse {
    fn stats(&self) -> BulkStats {
        let mut stats = BulkStats::default();
        for item in self.items.iter().flat_map(|op| op.values()) {
            if (200..300).contains(&item.status) {
                stats.succeeded += 1;
            } else {
                stats.failed += 1;
            }
        }
        stats
    }
}

#[async_trait]
impl SearchIndex for ElasticsearchClient {
    async fn search(&self, index: &str, query: &AggregationQuery) -> Result<SearchResponse> {
        let response = self
            .http
            .post(self.url(&format!("{}/_search", index)))
            .json(query)
            .send()
            .await
            .map_err(transport)?;
        ensure_success(response)
            .await?
            .json::<SearchResponse>()
            .await
            .map_err(decode)
    }

    async fn index_exists(&self, index: &str) -> Result<bool> {
        let response = self
            .http
            .head(self.url(index))
            .send()
            .await
            .map_err(transport)?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            _ => ensure_success(response).await.map(|_| true),
        }
    }

    async fn create_index(&self, index: &str, mapping: &IndexMapping) -> Result<()> {
        let response = self
            .http
            .put(self.url(index))
            .json(mapping)
            .send()
            .await
            .map_err(transport)?;
        ensure_success(response).await.map(|_| ())
    }

    async fn delete_index(&self, index: &str) -> Result<()> {
        let response = self
            .http
            .delete(self.url(index))
            .send()
            .await
            .map_err(transport)?;
        ensure_success(response).await.map(|_| ())
    }

    async fn bulk_index(&self, index: &str, documents: &[TweetDocument]) -> Result<BulkStats> {
        if documents.is_empty() {
            return Ok(BulkStats::default());
        }
        let response = self
            .http
            .post(self.url("_bulk"))
            .header(reqwest::header::CONTENT_TYPE, "application/x-ndjson")
            .body(bulk_body(index, documents)?)
            .send()
            .await
            .map_err(transport)?;
        let bulk = ensure_success(response)
            .await?
            .json::<BulkResponse>()
            .await
            .map_err(decode)?;
        Ok(bulk.stats())
    }
}
