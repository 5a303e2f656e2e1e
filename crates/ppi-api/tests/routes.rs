//! Router-level tests: requests go through the full layer stack.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use ppi_api::{create_app, AppState};
use ppi_core::ProfanityRecord;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    let records = vec![
        ProfanityRecord::new("2020-11-04T00:00:00Z", "fuck", "trump", 3),
        ProfanityRecord::new("2020-11-04T00:00:00Z", "fuck", "biden", 1),
        ProfanityRecord::new("2020-11-04T00:00:00Z", "ass", "trump", 0),
        ProfanityRecord::new("2020-11-04T00:00:00Z", "ass", "biden", 2),
        ProfanityRecord::new("2020-11-04T00:01:00Z", "fuck", "trump", 4),
        ProfanityRecord::new("2020-11-04T00:01:00Z", "fuck", "biden", 0),
        ProfanityRecord::new("2020-11-04T00:01:00Z", "ass", "trump", 1),
        ProfanityRecord::new("2020-11-04T00:01:00Z", "ass", "biden", 1),
    ];
    create_app(AppState::new(records).unwrap())
}

async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get(app, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get_json(app(), "/v1/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["records"], 8);
}

#[tokio::test]
async fn test_options() {
    let (_, body) = get_json(app(), "/v1/options").await;
    assert_eq!(body["words"], json!(["fuck", "ass"]));
    assert_eq!(body["subjects"], json!(["trump", "biden"]));
    assert_eq!(body["start"], "2020-11-04T00:00:00Z");
    assert_eq!(body["end"], "2020-11-04T00:01:00Z");
}

#[tokio::test]
async fn test_series_filtered_by_word() {
    let (status, body) = get_json(app(), "/v1/series?word=fuck").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            { "time": "2020-11-04T00:00:00Z", "subject": "trump", "count": 3 },
            { "time": "2020-11-04T00:00:00Z", "subject": "biden", "count": 1 },
            { "time": "2020-11-04T00:01:00Z", "subject": "trump", "count": 4 },
            { "time": "2020-11-04T00:01:00Z", "subject": "biden", "count": 0 }
        ])
    );
}

#[tokio::test]
async fn test_totals_with_window_and_subjects() {
    let (_, body) = get_json(
        app(),
        "/v1/totals?start=2020-11-04T00:01:00Z&end=2020-11-04T00:01:00Z&subject=biden,trump",
    )
    .await;
    assert_eq!(
        body,
        json!([
            { "subject": "trump", "count": 5 },
            { "subject": "biden", "count": 1 }
        ])
    );
}

#[tokio::test]
async fn test_breakdown() {
    let (_, body) = get_json(app(), "/v1/breakdown?subject=trump").await;
    assert_eq!(
        body,
        json!([
            { "subject": "trump", "word": "fuck", "count": 7 },
            { "subject": "trump", "word": "ass", "count": 1 }
        ])
    );
}

#[tokio::test]
async fn test_bad_timestamp_is_bad_request() {
    let (status, body) = get_json(app(), "/v1/totals?start=last-tuesday").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("TIME/"));
}

#[tokio::test]
async fn test_inverted_window_is_bad_request() {
    let (status, _) = get_json(
        app(),
        "/v1/series?start=2020-11-04T00:01:00Z&end=2020-11-04T00:00:00Z",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_metrics_count_served_requests() {
    let app = app();
    get(app.clone(), "/v1/totals").await;
    get(app.clone(), "/v1/totals").await;

    let (status, body) = get(app, "/metrics").await;
    let text = String::from_utf8(body).unwrap();
    assert_eq!(status, StatusCode::OK);
    assert!(text.contains(r#"ppi_http_requests_total{route="/v1/totals",status="200"} 2"#));
    assert!(text.contains("ppi_records_loaded 8"));
}

#[tokio::test]
async fn test_unknown_route() {
    let (status, _) = get(app(), "/v2/nothing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
