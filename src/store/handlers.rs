use axum::{extract::State, Json};
use serde::Serialize;
use tracing::{debug, instrument};

use super::StoreStatus;
use crate::shared::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// HTTP handler reporting snapshot readiness
///
/// GET /health
/// Always 200; `status` is one of `loading`, `ready`, `failed`
#[instrument(name = "health", skip(state))]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = state.store.status();
    debug!(status = status.label(), "Health checked");

    let error = match &status {
        StoreStatus::Failed(error) => Some(error.to_string()),
        _ => None,
    };

    Json(HealthResponse {
        status: status.label(),
        error,
    })
}
