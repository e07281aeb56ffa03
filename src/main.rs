use nestris_stats::{router, AppConfig, AppState, AvatarManifest, StatRegistry, StoreHandle};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nestris_stats=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting NESTris statistics server");

    let config = AppConfig::from_env()?;
    let registry = Arc::new(StatRegistry::standard()?);
    info!(statistics = registry.len(), "Statistic registry built");

    // Queries answer 503 until the background load settles
    let store = StoreHandle::loading();
    let _loader = store.spawn_load(config.snapshot.clone(), config.store_options());

    let avatars = match &config.avatar_manifest {
        Some(location) => AvatarManifest::new(location.clone(), config.avatar_base_url.clone()),
        None => AvatarManifest::disabled(),
    };

    let app_state = AppState::new(store, registry, Arc::new(avatars));
    let app = router(app_state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, snapshot = %config.snapshot, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
