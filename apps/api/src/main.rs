mod config;
mod errors;
mod forest;
mod models;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::forest::{ForestConfig, LayoutEngine, LayoutStore, MemoryLayoutStore, RedisLayoutStore};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Forest API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the layout engine (refuses to start on invalid tuning)
    let engine = LayoutEngine::new(ForestConfig::default()).context("Invalid forest tuning")?;
    info!(
        "Forest engine ready: {} image variants, {} attempts per marker",
        engine.config().image_variants.len(),
        engine.config().max_attempts
    );

    // Initialize layout cache (Redis when configured, in-memory otherwise)
    let layouts = build_layout_store(&config).await?;
    info!("Layout cache initialized (backend: {})", layouts.backend());

    // Build app state
    let state = AppState {
        config: config.clone(),
        engine: Arc::new(engine),
        layouts,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS to the storefront origin

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Picks the layout cache backend from configuration.
async fn build_layout_store(config: &Config) -> Result<Arc<dyn LayoutStore>> {
    match &config.redis_url {
        Some(url) => {
            let store = RedisLayoutStore::connect(url, config.layout_cache_ttl_secs).await?;
            Ok(Arc::new(store))
        }
        None => Ok(Arc::new(MemoryLayoutStore::new(
            config.layout_cache_capacity,
        ))),
    }
}
