use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::player::AvatarManifest;
use crate::stats::{StatRegistry, StatsError, StatsService};
use crate::store::StoreHandle;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub store: StoreHandle,
    pub stats: Arc<StatsService>,
    pub avatars: Arc<AvatarManifest>,
}

impl AppState {
    /// Statistics are evaluated through the store handle, so they report
    /// `NotInitialized` until the snapshot has loaded.
    pub fn new(
        store: StoreHandle,
        registry: Arc<StatRegistry>,
        avatars: Arc<AvatarManifest>,
    ) -> Self {
        let stats = Arc::new(StatsService::new(registry, Arc::new(store.clone())));
        Self {
            store,
            stats,
            avatars,
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AppError {
    #[error("Snapshot is still loading")]
    NotReady,

    #[error("Snapshot failed to load: {0}")]
    LoadFailed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error")]
    Internal,
}

impl From<StatsError> for AppError {
    fn from(error: StatsError) -> Self {
        match error {
            StatsError::NotInitialized => AppError::NotReady,
            error if error.is_load_failure() => AppError::LoadFailed(error.to_string()),
            StatsError::Query(msg) => AppError::DatabaseError(msg),
            _ => AppError::Internal,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::NotReady => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Snapshot is still loading".to_string(),
            ),
            AppError::LoadFailed(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Snapshot failed to load: {}", msg),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
