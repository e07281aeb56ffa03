use axum::Router;
use std::sync::Arc;

use nestris_stats::{
    router, AppState, AvatarManifest, SnapshotStore, StatRegistry, StatsService, StoreHandle,
};

use super::snapshot_builder::{SnapshotBuilder, SnapshotFixture};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub store: StoreHandle,
    pub stats: StatsService,
    pub app: Router,
    pub _fixture: SnapshotFixture,
}

pub struct TestSetupBuilder {
    snapshot: SnapshotBuilder,
    avatars: Option<AvatarManifest>,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            snapshot: SnapshotBuilder::new().with_standard_history(),
            avatars: None,
        }
    }

    pub fn with_snapshot(mut self, snapshot: SnapshotBuilder) -> Self {
        self.snapshot = snapshot;
        self
    }

    pub fn with_avatars(mut self, avatars: AvatarManifest) -> Self {
        self.avatars = Some(avatars);
        self
    }

    /// Opens the fixture in place and wires a ready store into the services and router.
    pub async fn build(self) -> TestSetup {
        let fixture = self.snapshot.build().await;
        let snapshot = SnapshotStore::open(fixture.path(), 2).await.unwrap();
        let store = StoreHandle::ready(snapshot);

        let registry = Arc::new(StatRegistry::standard().unwrap());
        let stats = StatsService::new(Arc::clone(&registry), Arc::new(store.clone()));
        let avatars = self.avatars.unwrap_or_else(AvatarManifest::disabled);
        let app = router(AppState::new(store.clone(), registry, Arc::new(avatars)));

        TestSetup {
            store,
            stats,
            app,
            _fixture: fixture,
        }
    }
}

impl Default for TestSetupBuilder {
    fn default() -> Self {
        Self::new()
    }
}
