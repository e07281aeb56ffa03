use axum::{http::Method, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::player::{get_player, list_players};
use crate::shared::AppState;
use crate::stats::{evaluate_stat, head_to_head, list_stats};
use crate::store::health;

/// Read-only HTTP surface. Every route is a GET.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_origin(Any);

    Router::new()
        .route("/health", get(health))
        .route("/stats", get(list_stats))
        .route("/stats/:id", get(evaluate_stat))
        .route("/players", get(list_players))
        .route("/players/:id", get(get_player))
        .route("/head-to-head", get(head_to_head))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
