use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    /// The snapshot is still loading; retry once the store reports ready.
    #[error("Snapshot store is not initialized")]
    NotInitialized,

    #[error("Resource unavailable: {0}")]
    ResourceUnavailable(String),

    #[error("Malformed resource: {0}")]
    MalformedResource(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Duplicate statistic id: {0}")]
    DuplicateStatId(String),
}

impl StatsError {
    /// True for failures that end query functionality for the session.
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            StatsError::ResourceUnavailable(_) | StatsError::MalformedResource(_)
        )
    }
}
