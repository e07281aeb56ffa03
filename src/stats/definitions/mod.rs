mod games;
mod offense;

pub use games::{game_stats, GameWins, TotalGames};
pub use offense::{offense_stats, MatchWinRate, TotalMatches, TotalWins};

/// Per-match rows: one per participant of each match.
pub const MATCH_RESULTS_SOURCE: &str =
    "match_results mr JOIN matches m ON m.match_id = mr.match_id";

/// Per-game rows: one per participant of each game, with the owning match.
pub const GAME_RESULTS_SOURCE: &str = "game_results gr JOIN games g ON g.game_id = gr.game_id JOIN matches m ON m.match_id = g.match_id";

/// COUNT decoded as REAL so every statistic shares one row shape.
pub(crate) const COUNT_VALUE: &str = "CAST(COUNT(*) AS REAL)";
