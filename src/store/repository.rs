use async_trait::async_trait;
use sqlx::query::QueryAs;
use sqlx::sqlite::{SqliteArguments, SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Sqlite;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::resource::ResourceLocation;
use crate::stats::{
    compiler::{compile, FilterColumns},
    BindValue, ExecutionBackend, MatchSummary, PlayerId, PlayerSummary, StatQuery, StatRow,
    StatisticalContext, StatisticalFilters, StatsError,
};

/// Every snapshot starts with this header.
pub const SQLITE_HEADER: &[u8; 16] = b"SQLite format 3\0";

/// Tables the statistics and history queries read from.
pub const REQUIRED_TABLES: [&str; 7] = [
    "players",
    "matches",
    "match_results",
    "games",
    "game_results",
    "event_rounds",
    "events",
];

const HISTORY_COLUMNS: FilterColumns = FilterColumns {
    player: "ra.player_id",
    match_timestamp: "m.match_timestamp",
    event_round: "m.event_round_id",
};

#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub max_connections: u32,
    /// Directory fetched snapshot bytes are written to before opening.
    pub cache_dir: PathBuf,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            max_connections: 4,
            cache_dir: std::env::temp_dir(),
        }
    }
}

/// The read-only snapshot opened as a SQLite database.
///
/// The player-name map is filled on first access and kept for the store's
/// lifetime. There is no invalidation path: the snapshot never changes.
#[derive(Debug)]
pub struct SnapshotStore {
    pool: SqlitePool,
    materialized: Option<PathBuf>,
    player_names: OnceCell<HashMap<PlayerId, String>>,
}

impl SnapshotStore {
    /// Fetches the snapshot from `location` and opens it.
    #[instrument(skip(options))]
    pub async fn load(
        location: &ResourceLocation,
        options: &StoreOptions,
    ) -> Result<Self, StatsError> {
        info!(location = %location, "Loading snapshot");
        let bytes = location.fetch().await?;
        Self::from_bytes(&bytes, options).await
    }

    /// Validates raw snapshot bytes, materializes them under the cache dir and
    /// opens the copy read-only.
    #[instrument(skip(bytes, options), fields(bytes = bytes.len()))]
    pub async fn from_bytes(bytes: &[u8], options: &StoreOptions) -> Result<Self, StatsError> {
        if bytes.len() < SQLITE_HEADER.len() || !bytes.starts_with(SQLITE_HEADER) {
            warn!("Snapshot does not carry a SQLite header");
            return Err(StatsError::MalformedResource(
                "snapshot is not a SQLite database".to_string(),
            ));
        }

        let path = options
            .cache_dir
            .join(format!("nestris-snapshot-{}.sqlite3", Uuid::new_v4()));
        tokio::fs::write(&path, bytes).await.map_err(|e| {
            warn!(error = %e, path = %path.display(), "Failed to materialize snapshot");
            StatsError::ResourceUnavailable(format!("cannot write {}: {}", path.display(), e))
        })?;

        match Self::open(&path, options.max_connections).await {
            Ok(mut store) => {
                store.materialized = Some(path);
                Ok(store)
            }
            Err(error) => {
                let _ = std::fs::remove_file(&path);
                Err(error)
            }
        }
    }

    /// Opens an existing snapshot file in place, read-only.
    #[instrument]
    pub async fn open(path: &Path, max_connections: u32) -> Result<Self, StatsError> {
        if !path.exists() {
            return Err(StatsError::ResourceUnavailable(format!(
                "{} not found",
                path.display()
            )));
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .read_only(true)
            .create_if_missing(false);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await
            .map_err(|e| {
                warn!(error = %e, path = %path.display(), "Failed to open snapshot");
                StatsError::MalformedResource(e.to_string())
            })?;

        let store = Self {
            pool,
            materialized: None,
            player_names: OnceCell::new(),
        };
        store.verify_schema().await?;

        info!(path = %path.display(), "Snapshot opened read-only");
        Ok(store)
    }

    async fn verify_schema(&self) -> Result<(), StatsError> {
        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type IN ('table', 'view')",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Snapshot schema could not be read");
            StatsError::MalformedResource(e.to_string())
        })?;

        let present: HashSet<&str> = tables.iter().map(String::as_str).collect();
        let missing: Vec<&str> = REQUIRED_TABLES
            .iter()
            .copied()
            .filter(|table| !present.contains(table))
            .collect();

        if !missing.is_empty() {
            warn!(missing = ?missing, "Snapshot is missing tables");
            return Err(StatsError::MalformedResource(format!(
                "missing tables: {}",
                missing.join(", ")
            )));
        }

        debug!(tables = tables.len(), "Snapshot schema verified");
        Ok(())
    }

    /// `player_id → username` for every player, loaded once.
    pub async fn player_names(&self) -> Result<&HashMap<PlayerId, String>, StatsError> {
        self.player_names
            .get_or_try_init(|| async {
                let rows: Vec<PlayerSummary> =
                    sqlx::query_as("SELECT player_id, username FROM players")
                        .fetch_all(&self.pool)
                        .await
                        .map_err(query_error)?;

                debug!(players = rows.len(), "Player names cached");
                Ok::<_, StatsError>(rows
                    .into_iter()
                    .map(|row| (row.player_id, row.username))
                    .collect())
            })
            .await
    }

    pub async fn player_name(&self, player_id: PlayerId) -> Result<Option<String>, StatsError> {
        Ok(self.player_names().await?.get(&player_id).cloned())
    }

    /// All players ordered by name, case-insensitively.
    pub async fn players(&self) -> Result<Vec<PlayerSummary>, StatsError> {
        let mut players: Vec<PlayerSummary> = self
            .player_names()
            .await?
            .iter()
            .map(|(player_id, username)| PlayerSummary {
                player_id: *player_id,
                username: username.clone(),
            })
            .collect();

        players.sort_by(|a, b| {
            a.username
                .to_lowercase()
                .cmp(&b.username.to_lowercase())
                .then(a.player_id.cmp(&b.player_id))
        });
        Ok(players)
    }

    /// Matches both players took part in, newest first.
    #[instrument(skip(self, filters))]
    pub async fn match_history(
        &self,
        first: PlayerId,
        second: PlayerId,
        filters: Option<StatisticalFilters>,
    ) -> Result<Vec<MatchSummary>, StatsError> {
        let ctx = StatisticalContext {
            filters,
            player_id: None,
        };
        let predicate = compile(&ctx, &HISTORY_COLUMNS, &[]);

        let sql = format!(
            "SELECT m.match_id AS match_id, m.match_timestamp AS match_timestamp, \
             m.match_winner_id AS winner_id, e.name AS event_name, \
             (SELECT COUNT(*) FROM games g WHERE g.match_id = m.match_id AND g.game_winner_id = ra.player_id) AS first_games_won, \
             (SELECT COUNT(*) FROM games g WHERE g.match_id = m.match_id AND g.game_winner_id = rb.player_id) AS second_games_won \
             FROM matches m \
             JOIN match_results ra ON ra.match_id = m.match_id AND ra.player_id = ? \
             JOIN match_results rb ON rb.match_id = m.match_id AND rb.player_id = ? \
             LEFT JOIN event_rounds er ON er.event_round_id = m.event_round_id \
             LEFT JOIN events e ON e.event_id = er.event_id \
             {} \
             ORDER BY m.match_timestamp DESC, m.match_id DESC",
            predicate.where_clause()
        );

        let mut binds = vec![BindValue::Integer(first.0), BindValue::Integer(second.0)];
        binds.extend(predicate.into_binds());

        let matches = bind_all(sqlx::query_as::<_, MatchSummary>(&sql), &binds)
            .fetch_all(&self.pool)
            .await
            .map_err(query_error)?;

        debug!(first = %first, second = %second, matches = matches.len(), "Match history loaded");
        Ok(matches)
    }
}

#[async_trait]
impl ExecutionBackend for SnapshotStore {
    #[instrument(skip(self, query), fields(sql = %query.sql))]
    async fn evaluate_query(&self, query: &StatQuery) -> Result<Vec<StatRow>, StatsError> {
        let rows = bind_all(sqlx::query_as::<_, StatRow>(&query.sql), &query.binds)
            .fetch_all(&self.pool)
            .await
            .map_err(query_error)?;

        debug!(rows = rows.len(), "Query evaluated");
        Ok(rows)
    }
}

impl Drop for SnapshotStore {
    fn drop(&mut self) {
        if let Some(path) = self.materialized.take() {
            if let Err(e) = std::fs::remove_file(&path) {
                debug!(error = %e, path = %path.display(), "Materialized snapshot not removed");
            }
        }
    }
}

fn bind_all<'q, O>(
    mut query: QueryAs<'q, Sqlite, O, SqliteArguments<'q>>,
    binds: &[BindValue],
) -> QueryAs<'q, Sqlite, O, SqliteArguments<'q>> {
    for value in binds {
        query = match value {
            BindValue::Text(text) => query.bind(text.clone()),
            BindValue::Integer(number) => query.bind(*number),
        };
    }
    query
}

fn query_error(e: sqlx::Error) -> StatsError {
    warn!(error = %e, "Snapshot query failed");
    StatsError::Query(e.to_string())
}
