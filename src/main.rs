use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use reelmatch::{
    api::AppState,
    config::Config,
    routes::create_router,
    services::{providers::TmdbProvider, registry::ModelRegistry},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("reelmatch=info,tower_http=info")),
        )
        .init();

    // Model artifacts load once; a missing or inconsistent bundle is fatal
    let registry = ModelRegistry::load(Path::new(&config.artifacts_dir))?;
    let provider = TmdbProvider::new(config.tmdb_auth.clone(), config.tmdb_api_url.clone());
    let state = AppState::new(Arc::new(registry), Arc::new(provider));

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!(host = %config.host, port = config.port, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
