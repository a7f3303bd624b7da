//! HTTP surface over the prediction and history services.
//!
//! Both endpoints answer 200 with either the result or an `{ "error": ... }`
//! body; clients tell the two apart by the presence of `error`.

use crate::application::prediction::{HistoryService, PredictionService};
use crate::domain::market::history::HistoryResponse;
use crate::domain::prediction::PredictionResponse;
use crate::infrastructure::observability::Metrics;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub prediction: Arc<PredictionService>,
    pub history: Arc<HistoryService>,
    /// `None` when observability is disabled
    pub metrics: Option<Metrics>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub period: Option<String>,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/predict/{ticker}", get(predict))
        .route("/history/{ticker}", get(history))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "name": "stockcast",
        "version": env!("CARGO_PKG_VERSION"),
        "note": "Stock price prediction API. Try /predict/AAPL or /predict/RELIANCE.NS",
    }))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(metrics) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            metrics.render(),
        ),
        None => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "text/plain")],
            "metrics disabled\n".to_string(),
        ),
    }
}

async fn predict(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
) -> Json<PredictionResponse> {
    Json(state.prediction.predict(&ticker).await)
}

async fn history(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Json<HistoryResponse> {
    Json(
        state
            .history
            .get_history(&ticker, query.period.as_deref())
            .await,
    )
}
