use async_trait::async_trait;
use std::sync::Arc;

use super::super::{
    compiler::{compile, GAME_RESULT_COLUMNS},
    NumericStatistic, StatHandle, StatQuery, StatisticalContext,
};
use super::{COUNT_VALUE, GAME_RESULTS_SOURCE};

pub struct GameWins;

#[async_trait]
impl NumericStatistic for GameWins {
    fn id(&self) -> &'static str {
        "game_wins"
    }

    fn name(&self) -> &'static str {
        "Game Wins"
    }

    fn description(&self) -> &'static str {
        "Total number of individual games won"
    }

    fn query(&self, ctx: &StatisticalContext) -> StatQuery {
        let predicate = compile(ctx, &GAME_RESULT_COLUMNS, &["gr.player_id = g.game_winner_id"]);
        StatQuery::per_player(
            GAME_RESULT_COLUMNS.player,
            COUNT_VALUE,
            GAME_RESULTS_SOURCE,
            predicate,
        )
    }
}

pub struct TotalGames;

#[async_trait]
impl NumericStatistic for TotalGames {
    fn id(&self) -> &'static str {
        "total_games"
    }

    fn name(&self) -> &'static str {
        "Total Games"
    }

    fn description(&self) -> &'static str {
        "Total number of individual games played"
    }

    fn query(&self, ctx: &StatisticalContext) -> StatQuery {
        let predicate = compile(ctx, &GAME_RESULT_COLUMNS, &[]);
        StatQuery::per_player(
            GAME_RESULT_COLUMNS.player,
            COUNT_VALUE,
            GAME_RESULTS_SOURCE,
            predicate,
        )
    }
}

pub fn game_stats() -> Vec<StatHandle> {
    vec![Arc::new(GameWins), Arc::new(TotalGames)]
}
