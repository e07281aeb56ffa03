use async_trait::async_trait;
use std::sync::Arc;

use super::super::{
    compiler::{compile, MATCH_RESULT_COLUMNS},
    NumericStatistic, StatFormat, StatHandle, StatQuery, StatisticalContext,
};
use super::{COUNT_VALUE, MATCH_RESULTS_SOURCE};

const MATCH_WINNER: &str = "mr.player_id = m.match_winner_id";

pub struct TotalWins;

#[async_trait]
impl NumericStatistic for TotalWins {
    fn id(&self) -> &'static str {
        "total_wins"
    }

    fn name(&self) -> &'static str {
        "Total Wins"
    }

    fn description(&self) -> &'static str {
        "Total number of matches won"
    }

    fn query(&self, ctx: &StatisticalContext) -> StatQuery {
        let predicate = compile(ctx, &MATCH_RESULT_COLUMNS, &[MATCH_WINNER]);
        StatQuery::per_player(
            MATCH_RESULT_COLUMNS.player,
            COUNT_VALUE,
            MATCH_RESULTS_SOURCE,
            predicate,
        )
    }
}

pub struct TotalMatches;

#[async_trait]
impl NumericStatistic for TotalMatches {
    fn id(&self) -> &'static str {
        "total_matches"
    }

    fn name(&self) -> &'static str {
        "Total Matches"
    }

    fn description(&self) -> &'static str {
        "Total number of matches played"
    }

    fn query(&self, ctx: &StatisticalContext) -> StatQuery {
        let predicate = compile(ctx, &MATCH_RESULT_COLUMNS, &[]);
        StatQuery::per_player(
            MATCH_RESULT_COLUMNS.player,
            COUNT_VALUE,
            MATCH_RESULTS_SOURCE,
            predicate,
        )
    }
}

pub struct MatchWinRate;

#[async_trait]
impl NumericStatistic for MatchWinRate {
    fn id(&self) -> &'static str {
        "match_win_rate"
    }

    fn name(&self) -> &'static str {
        "Match Win Rate"
    }

    fn description(&self) -> &'static str {
        "Share of played matches that were won"
    }

    fn format(&self) -> StatFormat {
        StatFormat::Percentage
    }

    fn query(&self, ctx: &StatisticalContext) -> StatQuery {
        let predicate = compile(ctx, &MATCH_RESULT_COLUMNS, &[]);
        StatQuery::per_player(
            MATCH_RESULT_COLUMNS.player,
            "AVG(CASE WHEN mr.player_id = m.match_winner_id THEN 1.0 ELSE 0.0 END)",
            MATCH_RESULTS_SOURCE,
            predicate,
        )
    }
}

/// Match-level results, in display order.
pub fn offense_stats() -> Vec<StatHandle> {
    vec![
        Arc::new(TotalWins),
        Arc::new(TotalMatches),
        Arc::new(MatchWinRate),
    ]
}
