use anyhow::{Context, Result};
use house_valuation::dashboard::{create_router, AppState};
use house_valuation::{Config, ValuationSession};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("🏠 Starting House Valuation dashboard...");

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config);

    // Warm both caches so the first user action does no I/O
    let session = ValuationSession::new(&config);
    if session.dataset().load().is_none() {
        warn!("No dataset at {:?}, market insights disabled", config.data_path);
    }
    if session.model().load().is_none() {
        warn!("No model at {:?}, valuations will report it missing", config.model_path);
    }

    let app = create_router(Arc::new(AppState::new(session)));

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.addr))?;
    info!("🚀 Dashboard running on http://{}", config.addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Dashboard stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
