// Library crate for the NESTris statistics server
// This file exposes the public API for integration tests

pub mod app;
pub mod config;
pub mod player;
pub mod shared;
pub mod stats;
pub mod store;

// Re-export commonly used types for easier access in tests
pub use app::router;
pub use config::{AppConfig, ConfigError};
pub use player::AvatarManifest;
pub use shared::{AppError, AppState};
pub use stats::{
    ExecutionBackend, NumericStatistic, NumericStatisticResult, PlayerId, StatQuery,
    StatRegistry, StatisticalContext, StatisticalFilters, StatsError, StatsService,
};
pub use store::{ResourceLocation, SnapshotStore, StoreHandle, StoreOptions, StoreStatus};
