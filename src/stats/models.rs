use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use strum_macros::{AsRefStr, Display, EnumIter};

/// Player identifier as stored in the snapshot's integer `player_id` columns.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct PlayerId(pub i64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PlayerId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(PlayerId)
    }
}

impl From<i64> for PlayerId {
    fn from(value: i64) -> Self {
        PlayerId(value)
    }
}

/// Optional filter dimensions; an absent dimension is unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticalFilters {
    #[serde(default)]
    pub event_ids: Vec<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub playstyle: Option<String>,
    #[serde(default)]
    pub match_type: Option<String>,
}

impl StatisticalFilters {
    pub fn with_events<I, S>(mut self, event_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.event_ids = event_ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn starting(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn ending(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    pub fn with_playstyle(mut self, playstyle: impl Into<String>) -> Self {
        self.playstyle = Some(playstyle.into());
        self
    }

    pub fn with_match_type(mut self, match_type: impl Into<String>) -> Self {
        self.match_type = Some(match_type.into());
        self
    }

    pub fn is_unconstrained(&self) -> bool {
        self.event_ids.is_empty()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.playstyle.is_none()
            && self.match_type.is_none()
    }
}

/// Filters plus an optional single-player scope. Built fresh for every query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticalContext {
    #[serde(default)]
    pub filters: Option<StatisticalFilters>,
    #[serde(default)]
    pub player_id: Option<PlayerId>,
}

impl StatisticalContext {
    /// One result per player found, no filtering.
    pub fn all_players() -> Self {
        Self::default()
    }

    pub fn for_player(player_id: PlayerId) -> Self {
        Self {
            filters: None,
            player_id: Some(player_id),
        }
    }

    pub fn with_filters(mut self, filters: StatisticalFilters) -> Self {
        self.filters = Some(filters);
        self
    }

    pub fn with_player(mut self, player_id: PlayerId) -> Self {
        self.player_id = Some(player_id);
        self
    }

    pub fn filters(&self) -> Option<&StatisticalFilters> {
        self.filters.as_ref()
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StatCategory {
    Offense,
    Games,
}

/// How a statistic's value is rendered as display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatFormat {
    #[default]
    Count,
    /// Value is a fraction in `0.0..=1.0`.
    Percentage,
}

impl StatFormat {
    pub fn render(&self, value: f64) -> String {
        match self {
            StatFormat::Count => {
                if value.fract() == 0.0 {
                    format!("{}", value as i64)
                } else {
                    format!("{:.2}", value)
                }
            }
            StatFormat::Percentage => format!("{:.1}%", value * 100.0),
        }
    }
}

/// Row shape every statistic query must produce.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct StatRow {
    pub player_id: PlayerId,
    pub value: f64,
}

/// One computed value for one player.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericStatisticResult {
    pub player_id: PlayerId,
    pub value: f64,
    pub format: StatFormat,
}

impl NumericStatisticResult {
    pub fn from_row(row: StatRow, format: StatFormat) -> Self {
        Self {
            player_id: row.player_id,
            value: row.value,
            format,
        }
    }
}

impl fmt::Display for NumericStatisticResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format.render(self.value))
    }
}

/// A registry statistic evaluated for a single player.
#[derive(Debug, Clone, PartialEq)]
pub struct StatLine {
    pub stat_id: &'static str,
    pub name: &'static str,
    pub category: StatCategory,
    pub result: Option<NumericStatisticResult>,
}

/// A registry statistic evaluated for two players side by side.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonLine {
    pub stat_id: &'static str,
    pub name: &'static str,
    pub category: StatCategory,
    pub first: Option<NumericStatisticResult>,
    pub second: Option<NumericStatisticResult>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PlayerSummary {
    pub player_id: PlayerId,
    pub username: String,
}

/// One match both players of a head-to-head took part in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct MatchSummary {
    pub match_id: i64,
    pub match_timestamp: String,
    pub winner_id: Option<PlayerId>,
    pub event_name: Option<String>,
    pub first_games_won: i64,
    pub second_games_won: i64,
}
