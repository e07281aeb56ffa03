use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, instrument};

use super::{
    registry::StatRegistry, ComparisonLine, ExecutionBackend, NumericStatisticResult, PlayerId,
    StatCategory, StatHandle, StatLine, StatisticalContext, StatisticalFilters, StatsError,
};

/// Runs registry statistics against a backend on behalf of the presentation layer.
///
/// Nothing is cached: every call re-evaluates against the backend.
pub struct StatsService {
    registry: Arc<StatRegistry>,
    backend: Arc<dyn ExecutionBackend>,
}

impl StatsService {
    pub fn new(registry: Arc<StatRegistry>, backend: Arc<dyn ExecutionBackend>) -> Self {
        Self { registry, backend }
    }

    pub fn registry(&self) -> &StatRegistry {
        &self.registry
    }

    /// Evaluates one statistic. `Ok(None)` when the identifier is not registered.
    #[instrument(skip(self, ctx))]
    pub async fn evaluate(
        &self,
        stat_id: &str,
        ctx: &StatisticalContext,
    ) -> Result<Option<Vec<NumericStatisticResult>>, StatsError> {
        let Some(stat) = self.registry.get_stat(stat_id) else {
            debug!(stat_id = %stat_id, "Statistic not registered");
            return Ok(None);
        };

        let results = self.run(stat, ctx).await?;
        debug!(stat_id = %stat_id, rows = results.len(), "Statistic evaluated");
        Ok(Some(results))
    }

    /// Every registered statistic for one player, in registry order.
    #[instrument(skip(self, filters))]
    pub async fn player_lines(
        &self,
        player_id: PlayerId,
        filters: Option<StatisticalFilters>,
    ) -> Result<Vec<StatLine>, StatsError> {
        let ctx = scoped(player_id, filters);

        let lines = try_join_all(self.catalog().map(|(category, stat)| {
            let ctx = &ctx;
            async move {
                let result = self.single(stat, ctx).await?;
                Ok::<_, StatsError>(StatLine {
                    stat_id: stat.id(),
                    name: stat.name(),
                    category,
                    result,
                })
            }
        }))
        .await?;

        debug!(player_id = %player_id, lines = lines.len(), "Player statistics evaluated");
        Ok(lines)
    }

    /// Every registered statistic for two players side by side.
    #[instrument(skip(self, filters))]
    pub async fn compare(
        &self,
        first: PlayerId,
        second: PlayerId,
        filters: Option<StatisticalFilters>,
    ) -> Result<Vec<ComparisonLine>, StatsError> {
        let first_ctx = scoped(first, filters.clone());
        let second_ctx = scoped(second, filters);

        try_join_all(self.catalog().map(|(category, stat)| {
            let first_ctx = &first_ctx;
            let second_ctx = &second_ctx;
            async move {
                let (first, second) =
                    futures::try_join!(self.single(stat, first_ctx), self.single(stat, second_ctx))?;
                Ok::<_, StatsError>(ComparisonLine {
                    stat_id: stat.id(),
                    name: stat.name(),
                    category,
                    first,
                    second,
                })
            }
        }))
        .await
    }

    async fn run(
        &self,
        stat: &StatHandle,
        ctx: &StatisticalContext,
    ) -> Result<Vec<NumericStatisticResult>, StatsError> {
        stat.evaluate(self.backend.as_ref(), ctx).await
    }

    /// A player-scoped evaluation yields at most one row.
    async fn single(
        &self,
        stat: &StatHandle,
        ctx: &StatisticalContext,
    ) -> Result<Option<NumericStatisticResult>, StatsError> {
        Ok(self.run(stat, ctx).await?.into_iter().next())
    }

    /// Flattened registry order, each definition paired with its category.
    fn catalog(&self) -> impl Iterator<Item = (StatCategory, &StatHandle)> {
        self.registry
            .categories()
            .iter()
            .flat_map(|catalog| catalog.stats.iter().map(move |stat| (catalog.category, stat)))
    }
}

fn scoped(player_id: PlayerId, filters: Option<StatisticalFilters>) -> StatisticalContext {
    StatisticalContext {
        filters,
        player_id: Some(player_id),
    }
}
