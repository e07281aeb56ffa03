use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    service::PlayerService,
    types::{PlayerProfileResponse, PlayerResponse, ProfileParams, StatLineResponse},
};
use crate::shared::{AppError, AppState};
use crate::stats::PlayerId;

/// HTTP handler for the player picker
///
/// GET /players
/// Returns every player sorted by name
#[instrument(name = "list_players", skip(state))]
pub async fn list_players(
    State(state): State<AppState>,
) -> Result<Json<Vec<PlayerResponse>>, AppError> {
    let service = PlayerService::new(state.store.clone(), Arc::clone(&state.avatars));
    let players = service.list_players().await?;

    info!(player_count = players.len(), "Players listed successfully");

    Ok(Json(players))
}

/// HTTP handler for a player profile
///
/// GET /players/:id?events=&start=&end=
/// Returns the player plus every registry statistic scoped to them
#[instrument(name = "get_player", skip(state, params))]
pub async fn get_player(
    State(state): State<AppState>,
    Path(player_id): Path<PlayerId>,
    Query(params): Query<ProfileParams>,
) -> Result<Json<PlayerProfileResponse>, AppError> {
    let service = PlayerService::new(state.store.clone(), Arc::clone(&state.avatars));
    let player = service
        .get_player(player_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Unknown player: {}", player_id)))?;

    let stats = state
        .stats
        .player_lines(player_id, params.filters())
        .await?
        .into_iter()
        .map(StatLineResponse::from)
        .collect();

    info!(player_id = %player_id, username = %player.username, "Player profile served");

    Ok(Json(PlayerProfileResponse { player, stats }))
}
