use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use std::path::{Path, PathBuf};

// ============================================================================
// Snapshot Schema
// ============================================================================

const SCHEMA: &[&str] = &[
    "CREATE TABLE players (player_id INTEGER PRIMARY KEY, username TEXT NOT NULL)",
    "CREATE TABLE events (event_id TEXT PRIMARY KEY, name TEXT NOT NULL)",
    "CREATE TABLE event_rounds (event_round_id INTEGER PRIMARY KEY, event_id TEXT NOT NULL)",
    "CREATE TABLE matches (match_id INTEGER PRIMARY KEY, match_timestamp TEXT NOT NULL, match_winner_id INTEGER, event_round_id INTEGER)",
    "CREATE TABLE match_results (match_id INTEGER NOT NULL, player_id INTEGER NOT NULL)",
    "CREATE TABLE games (game_id INTEGER PRIMARY KEY, match_id INTEGER NOT NULL, game_winner_id INTEGER)",
    "CREATE TABLE game_results (game_id INTEGER NOT NULL, player_id INTEGER NOT NULL)",
];

// ============================================================================
// Snapshot Fixture
// ============================================================================

/// A snapshot file on disk, removed when dropped.
pub struct SnapshotFixture {
    path: PathBuf,
}

impl SnapshotFixture {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn bytes(&self) -> Vec<u8> {
        tokio::fs::read(&self.path).await.unwrap()
    }
}

impl Drop for SnapshotFixture {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

// ============================================================================
// Snapshot Builder
// ============================================================================

pub struct SnapshotBuilder {
    statements: Vec<String>,
    schema: bool,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self {
            statements: vec![],
            schema: true,
        }
    }

    /// Three players, two events and two matches between alice and bob:
    ///
    /// - match 100, 2024-01-15 18:00, CTWC, alice wins 2-1
    /// - match 101, 2024-02-20 09:30, CTM, bob wins 2-0
    ///
    /// carol has played nothing.
    pub fn with_standard_history(self) -> Self {
        self.with_player(1, "alice")
            .with_player(2, "bob")
            .with_player(3, "carol")
            .with_event("ctwc", "CTWC", 10)
            .with_event("ctm", "CTM", 20)
            .with_match(100, "2024-01-15 18:00:00", 1, 10, &[1, 2])
            .with_match(101, "2024-02-20 09:30:00", 2, 20, &[1, 2])
            .with_games(100, &[(1000, 1), (1001, 2), (1002, 1)], &[1, 2])
            .with_games(101, &[(1010, 2), (1011, 2)], &[1, 2])
    }

    /// Leaves the tables out, for schema validation tests.
    pub fn without_schema(mut self) -> Self {
        self.schema = false;
        self
    }

    pub fn with_player(mut self, player_id: i64, username: &str) -> Self {
        self.statements.push(format!(
            "INSERT INTO players (player_id, username) VALUES ({}, '{}')",
            player_id, username
        ));
        self
    }

    pub fn with_event(mut self, event_id: &str, name: &str, round_id: i64) -> Self {
        self.statements.push(format!(
            "INSERT INTO events (event_id, name) VALUES ('{}', '{}')",
            event_id, name
        ));
        self.statements.push(format!(
            "INSERT INTO event_rounds (event_round_id, event_id) VALUES ({}, '{}')",
            round_id, event_id
        ));
        self
    }

    pub fn with_match(
        mut self,
        match_id: i64,
        timestamp: &str,
        winner_id: i64,
        round_id: i64,
        players: &[i64],
    ) -> Self {
        self.statements.push(format!(
            "INSERT INTO matches (match_id, match_timestamp, match_winner_id, event_round_id) VALUES ({}, '{}', {}, {})",
            match_id, timestamp, winner_id, round_id
        ));
        for player_id in players {
            self.statements.push(format!(
                "INSERT INTO match_results (match_id, player_id) VALUES ({}, {})",
                match_id, player_id
            ));
        }
        self
    }

    /// `games` are `(game_id, winner_id)` pairs; every player in `players`
    /// gets a result row for each game.
    pub fn with_games(mut self, match_id: i64, games: &[(i64, i64)], players: &[i64]) -> Self {
        for (game_id, winner_id) in games {
            self.statements.push(format!(
                "INSERT INTO games (game_id, match_id, game_winner_id) VALUES ({}, {}, {})",
                game_id, match_id, winner_id
            ));
            for player_id in players {
                self.statements.push(format!(
                    "INSERT INTO game_results (game_id, player_id) VALUES ({}, {})",
                    game_id, player_id
                ));
            }
        }
        self
    }

    /// Writes a self-contained SQLite file (no WAL sidecar) to the temp dir.
    pub async fn build(self) -> SnapshotFixture {
        let path = std::env::temp_dir().join(format!("fixture-{}.sqlite3", uuid::Uuid::new_v4()));

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Delete);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();

        if self.schema {
            for statement in SCHEMA {
                sqlx::query(statement).execute(&pool).await.unwrap();
            }
        } else {
            sqlx::query("CREATE TABLE unrelated (id INTEGER)")
                .execute(&pool)
                .await
                .unwrap();
        }
        for statement in &self.statements {
            sqlx::query(statement).execute(&pool).await.unwrap();
        }

        pool.close().await;
        SnapshotFixture { path }
    }
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        Self::new()
    }
}
