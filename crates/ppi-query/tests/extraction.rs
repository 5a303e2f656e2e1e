//! End-to-end extraction: against an in-memory index, and through the real
//! HTTP client against a stand-in Elasticsearch.

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{head, post},
    Json, Router,
};
use chrono::DateTime;
use ppi_core::{PpiError, ProfanityRecord, Result, SubjectSet, TimeRange, TweetDocument};
use ppi_query::{
    extract_profanity, AggregationQuery, BulkStats, ElasticsearchClient, ExtractionRequest,
    IndexMapping, SearchIndex, SearchResponse,
};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn request() -> ExtractionRequest {
    let range = TimeRange::new(
        DateTime::parse_from_rfc3339("2020-11-04T00:00:00Z").unwrap(),
        DateTime::parse_from_rfc3339("2020-11-04T00:05:00Z").unwrap(),
    );
    ExtractionRequest::with_default_mapping(range, SubjectSet::new(["Trump", "Biden"]).unwrap())
        .unwrap()
}

fn canned_response() -> Value {
    json!({
        "took": 3,
        "hits": { "total": { "value": 4, "relation": "eq" }, "hits": [] },
        "aggregations": { "tweets_per_minute": { "buckets": [
            {
                "key_as_string": "2020-11-04T00:01:00Z",
                "doc_count": 4,
                "profanity": { "buckets": {
                    "fuck": { "doc_count": 3, "target": { "buckets": { "Trump": { "doc_count": 3 } } } },
                    "ass": { "doc_count": 1, "target": { "buckets": { "Biden": { "doc_count": 1 } } } }
                } }
            },
            { "key_as_string": "2020-11-04T00:02:00Z", "doc_count": 0 }
        ] } }
    })
}

// =============================================================================
// In-memory index
// =============================================================================

struct CannedIndex {
    response: Value,
    seen: Mutex<Vec<Value>>,
}

#[async_trait]
impl SearchIndex for CannedIndex {
    async fn search(&self, _index: &str, query: &AggregationQuery) -> Result<SearchResponse> {
        self.seen.lock().unwrap().push(serde_json::to_value(query)?);
        Ok(serde_json::from_value(self.response.clone())?)
    }

    async fn index_exists(&self, _index: &str) -> Result<bool> {
        Ok(true)
    }

    async fn create_index(&self, _index: &str, _mapping: &IndexMapping) -> Result<()> {
        Ok(())
    }

    async fn delete_index(&self, _index: &str) -> Result<()> {
        Ok(())
    }

    async fn bulk_index(&self, _index: &str, documents: &[TweetDocument]) -> Result<BulkStats> {
        Ok(BulkStats {
            succeeded: documents.len() as u64,
            failed: 0,
        })
    }
}

#[tokio::test]
async fn test_extract_returns_dense_report() {
    let index = CannedIndex {
        response: canned_response(),
        seen: Mutex::new(Vec::new()),
    };

    let records = extract_profanity(&index, "ppi", &request()).await.unwrap();

    // 2 minutes × 5 default terms × 2 subjects
    assert_eq!(records.len(), 20);
    assert_eq!(records[0], ProfanityRecord::new("2020-11-04T00:01:00Z", "fuck", "Trump", 3));
    assert_eq!(records[1], ProfanityRecord::new("2020-11-04T00:01:00Z", "fuck", "Biden", 0));
    assert!(records.contains(&ProfanityRecord::new("2020-11-04T00:01:00Z", "ass", "Biden", 1)));
    assert_eq!(records.iter().map(|r| r.count).sum::<u64>(), 4);

    let seen = index.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0]["size"], json!(0));
}

#[tokio::test]
async fn test_missing_histogram_is_an_error() {
    let index = CannedIndex {
        response: json!({ "hits": { "total": 0 } }),
        seen: Mutex::new(Vec::new()),
    };
    let err = extract_profanity(&index, "ppi", &request()).await.unwrap_err();
    assert!(matches!(err, PpiError::ResponseShape(_)));
}

// =============================================================================
// HTTP client against a stand-in server
// =============================================================================

#[derive(Default)]
struct FakeCluster {
    indices: HashSet<String>,
    searches: Vec<(String, Value)>,
    bulk_lines: Vec<String>,
}

type Shared = Arc<Mutex<FakeCluster>>;

async fn search(
    State(state): State<Shared>,
    Path(index): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut cluster = state.lock().unwrap();
    if !cluster.indices.contains(&index) {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": { "type": "index_not_found_exception" }, "status": 404 })),
        );
    }
    let response = match index.as_str() {
        "garbled" => json!({ "aggregations": { "tweets_per_minute": { "buckets": "none" } } }),
        "lopsided" => json!({ "aggregations": { "tweets_per_minute": { "buckets": [{
            "key_as_string": "2020-11-04T00:01:00Z",
            "profanity": { "buckets": {
                "fuck": { "doc_count": 2, "target": { "buckets": [] } },
                "shit": { "doc_count": 1, "target": { "buckets": { "Biden": {} } } }
            } }
        }] } } }),
        _ => canned_response(),
    };
    cluster.searches.push((index, body));
    (StatusCode::OK, Json(response))
}

async fn exists(State(state): State<Shared>, Path(index): Path<String>) -> StatusCode {
    if state.lock().unwrap().indices.contains(&index) {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn create(State(state): State<Shared>, Path(index): Path<String>) -> Json<Value> {
    state.lock().unwrap().indices.insert(index.clone());
    Json(json!({ "acknowledged": true, "index": index }))
}

async fn delete(State(state): State<Shared>, Path(index): Path<String>) -> Json<Value> {
    state.lock().unwrap().indices.remove(&index);
    Json(json!({ "acknowledged": true }))
}

async fn bulk(State(state): State<Shared>, body: Bytes) -> Json<Value> {
    let text = String::from_utf8_lossy(&body).to_string();
    let lines: Vec<String> = text.lines().map(String::from).collect();
    let items: Vec<Value> = lines
        .chunks(2)
        .map(|pair| {
            let status = if pair[1].contains("\"text\":\"\"") { 400 } else { 201 };
            json!({ "index": { "status": status } })
        })
        .collect();
    state.lock().unwrap().bulk_lines.extend(lines);
    Json(json!({ "errors": items.iter().any(|i| i["index"]["status"] != 201), "items": items }))
}

async fn spawn_cluster() -> (String, Shared) {
    let state: Shared = Arc::new(Mutex::new(FakeCluster::default()));
    let app = Router::new()
        .route("/_bulk", post(bulk))
        .route("/{index}/_search", post(search))
        .route("/{index}", head(exists).put(create).delete(delete))
        .with_state(state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), state)
}

fn tweet(id: &str, text: &str) -> TweetDocument {
    TweetDocument {
        id: id.to_string(),
        coordinates: Some([-97.74, 30.27]),
        text: text.to_string(),
        created_at: "Wed Nov 04 00:01:12 +0000 2020".to_string(),
    }
}

#[tokio::test]
async fn test_client_index_lifecycle() {
    let (url, _state) = spawn_cluster().await;
    let client = ElasticsearchClient::new(&url, Duration::from_secs(5)).unwrap();

    assert!(!client.index_exists("ppi").await.unwrap());
    client.create_index("ppi", &IndexMapping::tweets()).await.unwrap();
    assert!(client.index_exists("ppi").await.unwrap());
    client.delete_index("ppi").await.unwrap();
    assert!(!client.index_exists("ppi").await.unwrap());
}

#[tokio::test]
async fn test_client_extraction_round_trip() {
    let (url, state) = spawn_cluster().await;
    let client = ElasticsearchClient::new(&url, Duration::from_secs(5)).unwrap();
    client.create_index("ppi", &IndexMapping::tweets()).await.unwrap();

    let records = extract_profanity(&client, "ppi", &request()).await.unwrap();
    assert_eq!(records.len(), 20);

    let cluster = state.lock().unwrap();
    let (index, body) = &cluster.searches[0];
    assert_eq!(index, "ppi");
    assert_eq!(body["query"]["range"]["created_at"]["lte"], json!("2020-11-04T00:05:00Z"));
}

#[tokio::test]
async fn test_client_surfaces_service_errors() {
    let (url, _state) = spawn_cluster().await;
    let client = ElasticsearchClient::new(&url, Duration::from_secs(5)).unwrap();

    let err = extract_profanity(&client, "missing", &request()).await.unwrap_err();
    match err {
        PpiError::Service { status, body } => {
            assert_eq!(status, 404);
            assert!(body.contains("index_not_found_exception"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_client_undecodable_histogram_is_shape_error() {
    let (url, _state) = spawn_cluster().await;
    let client = ElasticsearchClient::new(&url, Duration::from_secs(5)).unwrap();
    client.create_index("garbled", &IndexMapping::tweets()).await.unwrap();

    let err = extract_profanity(&client, "garbled", &request()).await.unwrap_err();
    assert!(matches!(err, PpiError::ResponseShape(_)), "unexpected error: {err}");
}

#[tokio::test]
async fn test_client_malformed_sub_tree_zero_fills() {
    let (url, _state) = spawn_cluster().await;
    let client = ElasticsearchClient::new(&url, Duration::from_secs(5)).unwrap();
    client.create_index("lopsided", &IndexMapping::tweets()).await.unwrap();

    let records = extract_profanity(&client, "lopsided", &request()).await.unwrap();
    assert_eq!(records.len(), 10);
    assert!(records.iter().all(|r| r.count == 0));
}

#[tokio::test]
async fn test_client_bulk_counts_items() {
    let (url, state) = spawn_cluster().await;
    let client = ElasticsearchClient::new(&url, Duration::from_secs(5)).unwrap();

    let stats = client
        .bulk_index("ppi", &[tweet("1", "holy shit"), tweet("2", ""), tweet("3", "dumbass")])
        .await
        .unwrap();
    assert_eq!(stats, BulkStats { succeeded: 2, failed: 1 });
    assert_eq!(state.lock().unwrap().bulk_lines.len(), 6);

    let empty = client.bulk_index("ppi", &[]).await.unwrap();
    assert_eq!(empty.processed(), 0);
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    let client = ElasticsearchClient::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
    let err = client.index_exists("ppi").await.unwrap_err();
    assert!(matches!(err, PpiError::Transport(_)));
}
