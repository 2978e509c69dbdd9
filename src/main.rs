use filmforecast_api::{
    api::{create_router, AppState},
    config::Config,
    db::{create_redis_client, Cache},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    // Metadata caching is opt-in
    let (cache, cache_writer) = match &config.redis_url {
        Some(url) => {
            let (cache, handle) = Cache::new(create_redis_client(url)?).await;
            tracing::info!(ttl = config.metadata_cache_ttl, "Metadata cache enabled");
            (Some(cache), Some(handle))
        }
        None => (None, None),
    };

    let state = AppState::from_config(&config, cache);
    let sweeper = state
        .sessions
        .spawn_sweeper(config.session_idle_ttl(), config.session_sweep_interval());
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %config.bind_addr(), "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    sweeper.shutdown().await;
    if let Some(handle) = cache_writer {
        handle.shutdown().await;
    }

    Ok(())
}
