use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

use super::repository::{SnapshotStore, StoreOptions};
use super::resource::ResourceLocation;
use crate::stats::{ExecutionBackend, StatQuery, StatRow, StatsError};

#[derive(Debug, Clone)]
pub enum StoreStatus {
    Loading,
    Ready(Arc<SnapshotStore>),
    Failed(StatsError),
}

impl StoreStatus {
    pub fn label(&self) -> &'static str {
        match self {
            StoreStatus::Loading => "loading",
            StoreStatus::Ready(_) => "ready",
            StoreStatus::Failed(_) => "failed",
        }
    }
}

/// Process-wide, read-only handle to the snapshot store.
///
/// Starts out `Loading`; a single load moves it to `Ready` or `Failed`, after
/// which it never changes. Subscribers are notified through a watch channel.
#[derive(Debug, Clone)]
pub struct StoreHandle {
    sender: Arc<watch::Sender<StoreStatus>>,
    receiver: watch::Receiver<StoreStatus>,
}

impl StoreHandle {
    pub fn loading() -> Self {
        let (sender, receiver) = watch::channel(StoreStatus::Loading);
        Self {
            sender: Arc::new(sender),
            receiver,
        }
    }

    /// A handle that is ready from the start, mostly for tests and fixtures.
    pub fn ready(store: SnapshotStore) -> Self {
        let handle = Self::loading();
        handle.complete(Ok(store));
        handle
    }

    pub fn status(&self) -> StoreStatus {
        self.receiver.borrow().clone()
    }

    /// The loaded store, or why it cannot be used yet.
    pub fn store(&self) -> Result<Arc<SnapshotStore>, StatsError> {
        match &*self.receiver.borrow() {
            StoreStatus::Loading => Err(StatsError::NotInitialized),
            StoreStatus::Ready(store) => Ok(Arc::clone(store)),
            StoreStatus::Failed(error) => Err(error.clone()),
        }
    }

    /// Readiness notifications for the presentation layer.
    pub fn subscribe(&self) -> watch::Receiver<StoreStatus> {
        self.sender.subscribe()
    }

    /// Resolves once the load has finished, successfully or not.
    pub async fn wait_ready(&self) -> Result<Arc<SnapshotStore>, StatsError> {
        let mut receiver = self.sender.subscribe();
        loop {
            let settled = match &*receiver.borrow_and_update() {
                StoreStatus::Loading => None,
                StoreStatus::Ready(store) => Some(Ok(Arc::clone(store))),
                StoreStatus::Failed(error) => Some(Err(error.clone())),
            };
            if let Some(outcome) = settled {
                return outcome;
            }
            if receiver.changed().await.is_err() {
                return Err(StatsError::NotInitialized);
            }
        }
    }

    /// Loads the snapshot in the background. Only the first completed load is kept.
    #[instrument(skip(self, options))]
    pub fn spawn_load(&self, location: ResourceLocation, options: StoreOptions) -> JoinHandle<()> {
        let handle = self.clone();
        tokio::spawn(async move {
            let result = SnapshotStore::load(&location, &options).await;
            handle.complete(result);
        })
    }

    /// Records the outcome of the load. Ignored once the handle has settled.
    pub fn complete(&self, result: Result<SnapshotStore, StatsError>) {
        let status = match result {
            Ok(store) => {
                info!("Snapshot ready");
                StoreStatus::Ready(Arc::new(store))
            }
            Err(error) => {
                warn!(error = %error, "Snapshot failed to load");
                StoreStatus::Failed(error)
            }
        };

        self.sender.send_if_modified(|current| {
            if matches!(current, StoreStatus::Loading) {
                *current = status;
                true
            } else {
                false
            }
        });
    }
}

#[async_trait]
impl ExecutionBackend for StoreHandle {
    async fn evaluate_query(&self, query: &StatQuery) -> Result<Vec<StatRow>, StatsError> {
        let store = self.store()?;
        store.evaluate_query(query).await
    }
}
