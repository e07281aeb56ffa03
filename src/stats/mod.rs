pub mod compiler;
pub mod definitions;
pub mod registry;
pub mod service;

mod errors;
mod handlers;
pub mod models;
mod types;

pub use compiler::{BindValue, FilterColumns, Predicate};
pub use errors::StatsError;
pub use handlers::{evaluate_stat, head_to_head, list_stats};
pub use models::*;
pub use registry::{CategoryCatalog, StatHandle, StatRegistry};
pub use service::StatsService;
pub use types::{
    filters_from, CategoryResponse, ComparisonRowResponse, HeadToHeadResponse, StatDescriptor,
    StatResultsResponse, StatValueResponse,
};

use async_trait::async_trait;

/// A statistic query: SQL text with `?` placeholders and the values bound to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatQuery {
    pub sql: String,
    pub binds: Vec<BindValue>,
}

impl StatQuery {
    /// Aggregates `value_expr` per player over `from`, highest value first.
    pub fn per_player(
        player_column: &str,
        value_expr: &str,
        from: &str,
        predicate: Predicate,
    ) -> Self {
        let mut clauses = vec![
            format!("SELECT {player_column} AS player_id, {value_expr} AS value"),
            format!("FROM {from}"),
        ];
        if !predicate.is_neutral() {
            clauses.push(predicate.where_clause());
        }
        clauses.push(format!("GROUP BY {player_column}"));
        clauses.push("ORDER BY value DESC".to_string());

        Self {
            sql: clauses.join(" "),
            binds: predicate.into_binds(),
        }
    }
}

/// The storage collaborator: runs a statistic query and returns its rows in order.
#[async_trait]
pub trait ExecutionBackend: Send + Sync {
    /// Fails with [`StatsError::NotInitialized`] while the snapshot is still loading.
    async fn evaluate_query(&self, query: &StatQuery) -> Result<Vec<StatRow>, StatsError>;
}

/// One named metric and the query that computes it.
#[async_trait]
pub trait NumericStatistic: Send + Sync {
    /// Stable identifier used for lookup and URLs.
    fn id(&self) -> &'static str;

    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn format(&self) -> StatFormat {
        StatFormat::Count
    }

    fn query(&self, ctx: &StatisticalContext) -> StatQuery;

    async fn evaluate(
        &self,
        backend: &dyn ExecutionBackend,
        ctx: &StatisticalContext,
    ) -> Result<Vec<NumericStatisticResult>, StatsError> {
        let query = self.query(ctx);
        let rows = backend.evaluate_query(&query).await?;
        let format = self.format();

        Ok(rows
            .into_iter()
            .map(|row| NumericStatisticResult::from_row(row, format))
            .collect())
    }
}
