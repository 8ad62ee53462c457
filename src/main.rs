//! lrutide server binary
//!
//! Serves a `Cache<String, String>` over HTTP with a background expiry
//! sweeper and optional snapshot persistence.

use std::net::SocketAddr;

use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lrutide::api::{create_router, AppState};
use lrutide::{Cache, Config, LoadOutcome};

/// Main entry point for the cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache and restore the snapshot, if configured
/// 4. Start the background expiry sweeper
/// 5. Serve HTTP until SIGINT/SIGTERM
/// 6. Stop the sweeper and write the snapshot, if configured
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lrutide=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting lrutide cache server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: max_entries={}, default_ttl={:?}, port={}, cleanup_interval={:?}",
        config.max_entries, config.default_ttl, config.server_port, config.cleanup_interval
    );

    let cache: Cache<String, String> = Cache::with_config(config.cache_config())?;
    if let Some(path) = &config.snapshot_path {
        match cache.load(path) {
            Ok(LoadOutcome::Loaded { restored, .. }) => {
                info!("Restored {} entries from snapshot", restored)
            }
            Ok(LoadOutcome::NotFound) => {}
            Err(e) => warn!("Snapshot not loaded, starting empty: {}", e),
        }
    }

    cache.start_sweeper()?;
    info!("Background expiry sweeper started");

    let app = create_router(AppState::new(cache.clone()));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cache.close().await;
    if let Some(path) = &config.snapshot_path {
        if let Err(e) = cache.save(path) {
            warn!("Failed to save snapshot: {}", e);
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
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
}
