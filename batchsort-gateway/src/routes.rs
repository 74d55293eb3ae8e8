//! Axum route handlers for the batchsort gateway API.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use batchsort_core::{Sequence, SequenceBatch, SortPlan, SortedBatch};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use uuid::Uuid;

use crate::{config::GatewayConfig, error::GatewayError};

// ── Shared state ─────────────────────────────────────────────────────────────

/// Per-router state: the plan used by `/process-concurrent`.
#[derive(Debug, Clone, Copy)]
pub struct AppState {
    concurrent: SortPlan,
}

impl AppState {
    /// Derive the concurrent plan from gateway configuration.
    #[must_use]
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self {
            concurrent: SortPlan::concurrent()
                .with_aggregation(config.aggregation)
                .with_max_concurrency(config.max_concurrency),
        }
    }
}

// ── Request / response types ──────────────────────────────────────────────────

/// Body accepted by both sort endpoints.
///
/// Decoded from the raw body whatever the `Content-Type` header says.
#[derive(Debug, Serialize, Deserialize)]
pub struct SortRequest {
    /// Sequences to sort. Absent or `null` is treated as an empty batch, and
    /// a `null` sequence inside it as an empty sequence.
    #[serde(default)]
    pub to_sort: Option<Vec<Option<Sequence>>>,
}

impl SortRequest {
    /// Decode a request body.
    ///
    /// # Errors
    /// Returns [`GatewayError::InvalidRequest`] if `body` is not a sort request.
    pub fn from_slice(body: &[u8]) -> Result<Self, GatewayError> {
        Ok(serde_json::from_slice(body)?)
    }

    /// The batch to sort, with every `null` replaced by an empty sequence.
    #[must_use]
    pub fn into_batch(self) -> SequenceBatch {
        self.to_sort
            .unwrap_or_default()
            .into_iter()
            .map(Option::unwrap_or_default)
            .collect()
    }
}

/// Body returned by both sort endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct SortResponse {
    /// One sorted copy of every input sequence.
    pub sorted_arrays: SortedBatch,
    /// Wall-clock nanoseconds spent sorting, excluding decode and encode.
    pub time_ns: u64,
}

// ── Router ────────────────────────────────────────────────────────────────────

/// Build the application router from the gateway configuration.
pub fn create_router(config: &GatewayConfig) -> Router {
    Router::new()
        .route("/process-single", post(process_single))
        .route("/process-concurrent", post(process_concurrent))
        .route("/health", get(health))
        .with_state(AppState::from_config(config))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// `GET /health` — liveness probe.
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({"status": "ok"})))
}

/// `POST /process-single` — sort every sequence in input order.
///
/// # Errors
/// Returns [`GatewayError::InvalidRequest`] if the body is not a valid sort request.
pub async fn process_single(
    payload: Result<Bytes, BytesRejection>,
) -> Result<Json<SortResponse>, GatewayError> {
    run_sort(SortPlan::sequential(), payload).await
}

/// `POST /process-concurrent` — sort every sequence on its own unit of work.
///
/// Output order is unspecified.
///
/// # Errors
/// Returns [`GatewayError::InvalidRequest`] if the body is not a valid sort
/// request, or [`GatewayError::Sort`] / [`GatewayError::Join`] if a unit of
/// work dies.
pub async fn process_concurrent(
    State(state): State<AppState>,
    payload: Result<Bytes, BytesRejection>,
) -> Result<Json<SortResponse>, GatewayError> {
    run_sort(state.concurrent, payload).await
}

// ── Execution helpers ─────────────────────────────────────────────────────────

/// Decode, sort off the async executor, and time only the sorting.
async fn run_sort(
    plan: SortPlan,
    payload: Result<Bytes, BytesRejection>,
) -> Result<Json<SortResponse>, GatewayError> {
    let batch = SortRequest::from_slice(&payload?)?.into_batch();
    let request_id = Uuid::new_v4();
    let sequences = batch.len();

    let outcome = tokio::task::spawn_blocking(move || plan.run(&batch))
        .await
        .map_err(|e| GatewayError::Join(e.to_string()))??;
    let time_ns = outcome.elapsed_ns();

    info!(%request_id, mode = %plan.mode, sequences, time_ns, "sort request complete");
    Ok(Json(SortResponse { sorted_arrays: outcome.sorted, time_ns }))
}
