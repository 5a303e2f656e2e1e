//! Cross-cutting layers: CORS for browser dashboards and request counting.
use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use tower_http::cors::CorsLayer;

use crate::AppState;

pub fn cors() -> CorsLayer {
    CorsLayer::permissive()
}

/// Counts each request under its route template.
pub async fn count_requests(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let response = next.run(req).await;
    state.metrics.observe(&route, response.status().as_u16());
    response
}
