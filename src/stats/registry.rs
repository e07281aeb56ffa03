use std::collections::HashSet;
use std::sync::Arc;

use super::{
    definitions::{game_stats, offense_stats},
    NumericStatistic, StatCategory, StatsError,
};

pub type StatHandle = Arc<dyn NumericStatistic>;

/// The definitions belonging to one category, in display order.
#[derive(Clone)]
pub struct CategoryCatalog {
    pub category: StatCategory,
    pub stats: Vec<StatHandle>,
}

impl CategoryCatalog {
    pub fn new(category: StatCategory, stats: Vec<StatHandle>) -> Self {
        Self { category, stats }
    }
}

/// Read-only catalog of every statistic, grouped by category.
///
/// Built once at startup. Category order and the order of definitions inside a
/// category are preserved in both the grouped and the flattened views.
pub struct StatRegistry {
    categories: Vec<CategoryCatalog>,
    all: Vec<StatHandle>,
}

impl StatRegistry {
    /// Rejects catalogs where two definitions share an identifier.
    pub fn new(categories: Vec<CategoryCatalog>) -> Result<Self, StatsError> {
        let all: Vec<StatHandle> = categories
            .iter()
            .flat_map(|catalog| catalog.stats.iter().cloned())
            .collect();

        let mut seen = HashSet::new();
        for stat in &all {
            if !seen.insert(stat.id()) {
                return Err(StatsError::DuplicateStatId(stat.id().to_string()));
            }
        }

        Ok(Self { categories, all })
    }

    /// Offense, then games.
    pub fn standard() -> Result<Self, StatsError> {
        Self::new(vec![
            CategoryCatalog::new(StatCategory::Offense, offense_stats()),
            CategoryCatalog::new(StatCategory::Games, game_stats()),
        ])
    }

    pub fn get_stat(&self, id: &str) -> Option<&StatHandle> {
        self.all.iter().find(|stat| stat.id() == id)
    }

    pub fn all(&self) -> &[StatHandle] {
        &self.all
    }

    pub fn categories(&self) -> &[CategoryCatalog] {
        &self.categories
    }

    /// Definitions of one category; empty when the category is not registered.
    pub fn category(&self, category: StatCategory) -> &[StatHandle] {
        self.categories
            .iter()
            .find(|catalog| catalog.category == category)
            .map(|catalog| catalog.stats.as_slice())
            .unwrap_or(&[])
    }

    /// The category a definition was registered under.
    pub fn category_of(&self, id: &str) -> Option<StatCategory> {
        self.categories
            .iter()
            .find(|catalog| catalog.stats.iter().any(|stat| stat.id() == id))
            .map(|catalog| catalog.category)
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::definitions::{TotalMatches, TotalWins};
    use rstest::rstest;

    fn registry() -> StatRegistry {
        StatRegistry::standard().unwrap()
    }

    #[test]
    fn identifiers_are_unique() {
        let registry = registry();
        let ids: HashSet<_> = registry.all().iter().map(|s| s.id()).collect();
        assert_eq!(ids.len(), registry.len());
    }

    #[rstest]
    #[case("total_wins")]
    #[case("total_matches")]
    #[case("match_win_rate")]
    #[case("game_wins")]
    #[case("total_games")]
    fn get_stat_round_trips(#[case] id: &str) {
        let registry = registry();
        assert_eq!(registry.get_stat(id).map(|s| s.id()), Some(id));
    }

    #[test]
    fn every_registered_id_resolves_to_itself() {
        let registry = registry();
        for stat in registry.all() {
            assert_eq!(registry.get_stat(stat.id()).unwrap().id(), stat.id());
        }
    }

    #[rstest]
    #[case("")]
    #[case("TOTAL_WINS")]
    #[case("avg_score")]
    fn unknown_ids_are_absent(#[case] id: &str) {
        assert!(registry().get_stat(id).is_none());
    }

    #[test]
    fn categories_keep_declared_order() {
        let registry = registry();
        let categories: Vec<_> = registry.categories().iter().map(|c| c.category).collect();
        assert_eq!(categories, vec![StatCategory::Offense, StatCategory::Games]);

        let flattened: Vec<_> = registry.all().iter().map(|s| s.id()).collect();
        assert_eq!(
            flattened,
            vec![
                "total_wins",
                "total_matches",
                "match_win_rate",
                "game_wins",
                "total_games"
            ]
        );
    }

    #[test]
    fn category_views_match_flattened_catalog() {
        let registry = registry();
        let offense: Vec<_> = registry
            .category(StatCategory::Offense)
            .iter()
            .map(|s| s.id())
            .collect();
        assert_eq!(offense, vec!["total_wins", "total_matches", "match_win_rate"]);
        assert_eq!(registry.category_of("game_wins"), Some(StatCategory::Games));
        assert_eq!(registry.category_of("missing"), None);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let result = StatRegistry::new(vec![
            CategoryCatalog::new(
                StatCategory::Offense,
                vec![Arc::new(TotalWins), Arc::new(TotalMatches)],
            ),
            CategoryCatalog::new(StatCategory::Games, vec![Arc::new(TotalWins)]),
        ]);

        assert!(matches!(
            result,
            Err(StatsError::DuplicateStatId(id)) if id == "total_wins"
        ));
    }

    #[test]
    fn missing_category_is_empty() {
        let registry = StatRegistry::new(vec![CategoryCatalog::new(
            StatCategory::Offense,
            vec![Arc::new(TotalWins)],
        )])
        .unwrap();
        assert!(registry.category(StatCategory::Games).is_empty());
    }
}
