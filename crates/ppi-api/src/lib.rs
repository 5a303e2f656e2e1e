//! PPI API /v1: dashboard data over an extracted report
//!
//! The report is loaded once and served read-only. Filtered endpoints take
//! `start`/`end` (inclusive, compared as instants) and comma-separated
//! `word`/`subject` allow-lists.
pub mod dashboard;
pub mod handlers;
pub mod metrics;
pub mod middleware;

use axum::{routing::get, Router};
use ppi_core::{PpiError, ProfanityRecord, Result};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::dashboard::Dashboard;
use crate::metrics::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Dashboard>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(records: Vec<ProfanityRecord>) -> Result<Self> {
        let metrics = Metrics::new().map_err(|e| PpiError::Config(e.to_string()))?;
        metrics.set_records(records.len());
        Ok(Self {
            dashboard: Arc::new(Dashboard::new(records)),
            metrics,
        })
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/v1/health", get(handlers::health))
        .route("/v1/options", get(handlers::options))
        .route("/v1/series", get(handlers::series))
        .route("/v1/totals", get(handlers::totals))
        .route("/v1/breakdown", get(handlers::breakdown))
        .route("/metrics", get(handlers::metrics))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::count_requests,
        ))
        .layer(middleware::cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(addr: &str, records: Vec<ProfanityRecord>) -> Result<()> {
    let app = create_app(AppState::new(records)?);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("PPI API listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
