use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::{info, instrument};

use super::{
    types::{
        CategoryResponse, ComparisonRowResponse, HeadToHeadParams, HeadToHeadPlayer,
        HeadToHeadResponse, StatDescriptor, StatParams, StatResultsResponse, StatValueResponse,
    },
    StatisticalContext,
};
use crate::shared::{AppError, AppState};

/// HTTP handler for the statistic catalog
///
/// GET /stats
/// Served from the registry alone, so it answers while the snapshot loads
#[instrument(name = "list_stats", skip(state))]
pub async fn list_stats(State(state): State<AppState>) -> Json<Vec<CategoryResponse>> {
    let categories: Vec<CategoryResponse> = state
        .stats
        .registry()
        .categories()
        .iter()
        .map(CategoryResponse::from)
        .collect();

    info!(categories = categories.len(), "Statistic catalog listed");
    Json(categories)
}

/// HTTP handler for evaluating one statistic
///
/// GET /stats/:id?player=&events=&start=&end=
/// Returns one row per player, highest value first
#[instrument(name = "evaluate_stat", skip(state, params))]
pub async fn evaluate_stat(
    State(state): State<AppState>,
    Path(stat_id): Path<String>,
    Query(params): Query<StatParams>,
) -> Result<Json<StatResultsResponse>, AppError> {
    let stat = state
        .stats
        .registry()
        .get_stat(&stat_id)
        .ok_or_else(|| AppError::NotFound(format!("Unknown statistic: {}", stat_id)))?;

    let descriptor = StatDescriptor {
        id: stat.id().to_string(),
        name: stat.name().to_string(),
        description: stat.description().to_string(),
        format: stat.format(),
    };

    let ctx = StatisticalContext {
        filters: params.filters(),
        player_id: params.player,
    };

    let results = state
        .stats
        .evaluate(&stat_id, &ctx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Unknown statistic: {}", stat_id)))?;

    let store = state.store.store()?;
    let names = store.player_names().await?;
    let results: Vec<StatValueResponse> = results
        .iter()
        .map(|result| StatValueResponse::new(result, names.get(&result.player_id).cloned()))
        .collect();

    info!(stat_id = %stat_id, rows = results.len(), "Statistic served");

    Ok(Json(StatResultsResponse {
        stat: descriptor,
        results,
    }))
}

/// HTTP handler for comparing two players
///
/// GET /head-to-head?a=&b=
/// Every registry statistic for both players plus the matches they shared
#[instrument(name = "head_to_head", skip(state, params), fields(a = %params.a, b = %params.b))]
pub async fn head_to_head(
    State(state): State<AppState>,
    Query(params): Query<HeadToHeadParams>,
) -> Result<Json<HeadToHeadResponse>, AppError> {
    if params.a == params.b {
        return Err(AppError::BadRequest(
            "Head-to-head needs two different players".to_string(),
        ));
    }

    let store = state.store.store()?;
    let names = store.player_names().await?;
    for player_id in [params.a, params.b] {
        if !names.contains_key(&player_id) {
            return Err(AppError::NotFound(format!("Unknown player: {}", player_id)));
        }
    }

    let filters = params.filters();
    let stats = state
        .stats
        .compare(params.a, params.b, filters.clone())
        .await?;
    let matches = store.match_history(params.a, params.b, filters).await?;

    info!(matches = matches.len(), "Head-to-head served");

    Ok(Json(HeadToHeadResponse {
        a: HeadToHeadPlayer {
            player_id: params.a,
            username: names.get(&params.a).cloned(),
        },
        b: HeadToHeadPlayer {
            player_id: params.b,
            username: names.get(&params.b).cloned(),
        },
        stats: stats.into_iter().map(ComparisonRowResponse::from).collect(),
        matches,
    }))
}
