//! Bounded Cache - an in-memory cache server that cannot leak
//!
//! Serves a capacity- and TTL-bounded cache over HTTP, sweeps expired entries
//! in the background and logs memory usage periodically.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bounded_cache::api::create_router;
use bounded_cache::{spawn_report_task, spawn_sweep_task, AppState, Config};

/// Main entry point for the cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load and validate configuration from environment variables
/// 3. Create the cache store with the configured bounds
/// 4. Start the TTL sweep and metrics report tasks
/// 5. Serve the HTTP API on the configured port
/// 6. On SIGINT/SIGTERM: stop the background tasks, then clear the cache
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bounded_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Bounded Cache Server");

    let config = Config::from_env();
    config.validate().context("Rejected configuration")?;
    info!(
        "Configuration loaded: capacity={}, default_ttl={}s, port={}, sweep_interval={}s, metrics_interval={}s",
        config.capacity,
        config.default_ttl,
        config.server_port,
        config.sweep_interval,
        config.metrics_interval
    );

    let state = AppState::from_config(&config);
    info!("Cache store initialized");

    let background = vec![
        spawn_sweep_task(state.cache.clone(), config.sweep_interval()),
        spawn_report_task(state.cache.clone(), config.metrics_interval()),
    ];
    info!("Background tasks started");

    let cache = state.cache.clone();
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(background))
        .await
        .context("Server error")?;

    let removed = cache.write().await.clear();
    info!(removed, "Cache cleared, server shutdown complete");

    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then aborts the background
/// tasks so the caller can clear the cache.
async fn shutdown_signal(background: Vec<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    for handle in background {
        handle.abort();
    }
    warn!("Background tasks aborted");
}
