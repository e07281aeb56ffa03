use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::stats::{filters_from, PlayerId, StatCategory, StatLine, StatisticalFilters};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerResponse {
    pub player_id: PlayerId,
    pub username: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatLineResponse {
    pub stat_id: String,
    pub name: String,
    pub category: StatCategory,
    pub value: Option<f64>,
    pub display: Option<String>,
}

impl From<StatLine> for StatLineResponse {
    fn from(line: StatLine) -> Self {
        Self {
            stat_id: line.stat_id.to_string(),
            name: line.name.to_string(),
            category: line.category,
            value: line.result.as_ref().map(|r| r.value),
            display: line.result.as_ref().map(|r| r.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfileResponse {
    pub player: PlayerResponse,
    pub stats: Vec<StatLineResponse>,
}

/// Query string for `GET /players/:id`
#[derive(Debug, Default, Deserialize)]
pub struct ProfileParams {
    pub events: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub playstyle: Option<String>,
    pub match_type: Option<String>,
}

impl ProfileParams {
    pub fn filters(&self) -> Option<StatisticalFilters> {
        filters_from(
            self.events.as_deref(),
            self.start,
            self.end,
            self.playstyle.as_deref(),
            self.match_type.as_deref(),
        )
    }
}
