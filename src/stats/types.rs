use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{
    CategoryCatalog, ComparisonLine, MatchSummary, NumericStatisticResult, PlayerId,
    StatCategory, StatFormat, StatisticalFilters,
};

/// Builds filters from query-string values. Returns `None` when nothing
/// constrains the evaluation, so callers fall back to the unfiltered query.
pub fn filters_from(
    events: Option<&str>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    playstyle: Option<&str>,
    match_type: Option<&str>,
) -> Option<StatisticalFilters> {
    let mut filters = StatisticalFilters::default();

    if let Some(events) = events {
        filters = filters.with_events(
            events
                .split(',')
                .map(str::trim)
                .filter(|event| !event.is_empty()),
        );
    }
    if let Some(start) = start {
        filters = filters.starting(start);
    }
    if let Some(end) = end {
        filters = filters.ending(end);
    }
    if let Some(playstyle) = playstyle.filter(|value| !value.trim().is_empty()) {
        filters = filters.with_playstyle(playstyle.trim());
    }
    if let Some(match_type) = match_type.filter(|value| !value.trim().is_empty()) {
        filters = filters.with_match_type(match_type.trim());
    }

    if filters.is_unconstrained() {
        None
    } else {
        Some(filters)
    }
}

/// Query string for `GET /stats/:id`
#[derive(Debug, Default, Deserialize)]
pub struct StatParams {
    pub player: Option<PlayerId>,
    pub events: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub playstyle: Option<String>,
    pub match_type: Option<String>,
}

impl StatParams {
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

/// Query string for `GET /head-to-head`
#[derive(Debug, Deserialize)]
pub struct HeadToHeadParams {
    pub a: PlayerId,
    pub b: PlayerId,
    pub events: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub playstyle: Option<String>,
    pub match_type: Option<String>,
}

impl HeadToHeadParams {
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

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatDescriptor {
    pub id: String,
    pub name: String,
    pub description: String,
    pub format: StatFormat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub category: StatCategory,
    pub stats: Vec<StatDescriptor>,
}

impl From<&CategoryCatalog> for CategoryResponse {
    fn from(catalog: &CategoryCatalog) -> Self {
        Self {
            category: catalog.category,
            stats: catalog
                .stats
                .iter()
                .map(|stat| StatDescriptor {
                    id: stat.id().to_string(),
                    name: stat.name().to_string(),
                    description: stat.description().to_string(),
                    format: stat.format(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatValueResponse {
    pub player_id: PlayerId,
    pub player_name: Option<String>,
    pub value: f64,
    pub display: String,
}

impl StatValueResponse {
    pub fn new(result: &NumericStatisticResult, player_name: Option<String>) -> Self {
        Self {
            player_id: result.player_id,
            player_name,
            value: result.value,
            display: result.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatResultsResponse {
    pub stat: StatDescriptor,
    pub results: Vec<StatValueResponse>,
}

/// One side of a comparison row; absent when the player has no rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatCell {
    pub value: f64,
    pub display: String,
}

impl From<&NumericStatisticResult> for StatCell {
    fn from(result: &NumericStatisticResult) -> Self {
        Self {
            value: result.value,
            display: result.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRowResponse {
    pub stat_id: String,
    pub name: String,
    pub category: StatCategory,
    pub a: Option<StatCell>,
    pub b: Option<StatCell>,
}

impl From<ComparisonLine> for ComparisonRowResponse {
    fn from(line: ComparisonLine) -> Self {
        Self {
            stat_id: line.stat_id.to_string(),
            name: line.name.to_string(),
            category: line.category,
            a: line.first.as_ref().map(StatCell::from),
            b: line.second.as_ref().map(StatCell::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadToHeadPlayer {
    pub player_id: PlayerId,
    pub username: Option<String>,
}

/// Response for `GET /head-to-head`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadToHeadResponse {
    pub a: HeadToHeadPlayer,
    pub b: HeadToHeadPlayer,
    pub stats: Vec<ComparisonRowResponse>,
    pub matches: Vec<MatchSummary>,
}
