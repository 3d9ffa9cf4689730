//! CBRates Server Binary
//!
//! Serves central bank exchange rates and conversions over HTTP.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cbrates_common::{Clock, SystemClock};
use cbrates_fx::{RateCache, RatesRepository};
use cbrates_gateway::build_gateways;
use cbrates_server::{create_router, AppState, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("Starting CBRates server");

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return Err(anyhow::anyhow!("Configuration error: {}", e));
    }

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let gateways = build_gateways(&config.gateways, clock.clone())?;
    let cache = Arc::new(RateCache::with_clock(gateways, clock));
    info!(banks = ?cache.countries(), "Rate cache ready");

    let repository = Arc::new(RatesRepository::new(cache));
    let state = Arc::new(AppState::new(repository, config.default_cb.clone()));
    let app = create_router(state);

    let listener = TcpListener::bind(config.bind_addr()).await?;
    info!(
        listen_addr = %config.listen_addr,
        listen_port = %config.listen_port,
        default_cb = %config.default_cb,
        "Server running"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
