//! API Handlers
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use ppi_core::{PpiError, PPI_VERSION};
use serde_json::{json, Value};

use crate::dashboard::{FilterParams, Options, SeriesPoint, SubjectTotal, WordCount};
use crate::AppState;

/// Error body `{"error": ...}` with a status picked from the error kind.
pub struct ApiError(PpiError);

impl From<PpiError> for ApiError {
    fn from(e: PpiError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            PpiError::InvalidArgument { .. } | PpiError::Timestamp(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "version": PPI_VERSION,
            "records": state.dashboard.len(),
        })),
    )
}

pub async fn options(State(state): State<AppState>) -> Json<Options> {
    Json(state.dashboard.options())
}

pub async fn series(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Result<Json<Vec<SeriesPoint>>, ApiError> {
    let filter = params.into_filter()?;
    Ok(Json(state.dashboard.series(&filter)))
}

pub async fn totals(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Result<Json<Vec<SubjectTotal>>, ApiError> {
    let filter = params.into_filter()?;
    Ok(Json(state.dashboard.totals(&filter)))
}

pub async fn breakdown(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Result<Json<Vec<WordCount>>, ApiError> {
    let filter = params.into_filter()?;
    Ok(Json(state.dashboard.breakdown(&filter)))
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    match state.metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}
