//! Translates a [`StatisticalContext`] into a parameterized `WHERE` fragment.
//!
//! Conditions are always emitted in the same order: definition-supplied base
//! conditions, event membership, start date, end date, player scope. Filter
//! values never appear in the SQL text; each one is a `?` placeholder with a
//! matching entry in [`Predicate::binds`].
//!
//! `playstyle` and `match_type` are carried by
//! [`StatisticalFilters`](super::models::StatisticalFilters) but the
//! snapshot schema offers no column for them, so they are not compiled.

use super::models::StatisticalContext;

/// A value bound to one `?` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindValue {
    Text(String),
    Integer(i64),
}

/// Column names a relation exposes for the filterable dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterColumns {
    pub player: &'static str,
    pub match_timestamp: &'static str,
    pub event_round: &'static str,
}

/// `match_results mr JOIN matches m`
pub const MATCH_RESULT_COLUMNS: FilterColumns = FilterColumns {
    player: "mr.player_id",
    match_timestamp: "m.match_timestamp",
    event_round: "m.event_round_id",
};

/// `game_results gr JOIN games g JOIN matches m`
pub const GAME_RESULT_COLUMNS: FilterColumns = FilterColumns {
    player: "gr.player_id",
    match_timestamp: "m.match_timestamp",
    event_round: "m.event_round_id",
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// AND-combined conditions with their bound values. Empty means neutral.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    conditions: Vec<String>,
    binds: Vec<BindValue>,
}

impl Predicate {
    pub fn is_neutral(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }

    pub fn binds(&self) -> &[BindValue] {
        &self.binds
    }

    /// The conditions joined with `AND`, without the `WHERE` keyword.
    pub fn sql(&self) -> String {
        self.conditions.join(" AND ")
    }

    /// `WHERE ...`, or an empty string for the neutral predicate.
    pub fn where_clause(&self) -> String {
        if self.is_neutral() {
            String::new()
        } else {
            format!("WHERE {}", self.sql())
        }
    }

    pub fn into_binds(self) -> Vec<BindValue> {
        self.binds
    }

    fn push(&mut self, condition: String, binds: impl IntoIterator<Item = BindValue>) {
        self.conditions.push(condition);
        self.binds.extend(binds);
    }
}

pub fn compile(
    ctx: &StatisticalContext,
    columns: &FilterColumns,
    base_conditions: &[&str],
) -> Predicate {
    let mut predicate = Predicate::default();

    for condition in base_conditions {
        predicate.push((*condition).to_string(), std::iter::empty());
    }

    if let Some(filters) = ctx.filters() {
        if !filters.event_ids.is_empty() {
            let placeholders = vec!["?"; filters.event_ids.len()].join(", ");
            predicate.push(
                format!(
                    "{} IN (SELECT event_round_id FROM event_rounds WHERE event_id IN ({}))",
                    columns.event_round, placeholders
                ),
                filters
                    .event_ids
                    .iter()
                    .map(|id| BindValue::Text(id.clone())),
            );
        }

        if let Some(start) = filters.start_date {
            predicate.push(
                format!("date({}) >= ?", columns.match_timestamp),
                [BindValue::Text(start.format(DATE_FORMAT).to_string())],
            );
        }

        if let Some(end) = filters.end_date {
            predicate.push(
                format!("date({}) <= ?", columns.match_timestamp),
                [BindValue::Text(end.format(DATE_FORMAT).to_string())],
            );
        }
    }

    if let Some(player_id) = ctx.player_id {
        predicate.push(
            format!("{} = ?", columns.player),
            [BindValue::Integer(player_id.0)],
        );
    }

    predicate
}
