//! Dashboard Cache - cache registry service for the scraping dashboard
//!
//! Hosts the tiered cache registry, keeps it swept and measured, and serves
//! the admin API the dashboard UI uses to inspect and invalidate it.

use std::net::SocketAddr;

use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dashboard_cache::api::{create_router, AppState};
use dashboard_cache::{spawn_maintenance_task, Config, Tier};

/// Main entry point for the cache service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the registry with one store per tier, plus the preference file
/// 4. Start the maintenance task (expiry sweep + stats refresh)
/// 5. Serve the admin API until SIGINT/SIGTERM
/// 6. Abort maintenance and tear the registry down
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dashboard_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting dashboard cache service");

    let config = Config::from_env();
    for tier in Tier::ALL {
        let tier_config = config.tier(tier);
        info!(
            "Tier {}: max_size={}, ttl={}ms",
            tier,
            tier_config.max_size,
            tier_config.ttl.as_millis()
        );
    }

    // Preference writes go through to PREFERENCES_PATH when it is set
    let state = AppState::from_config(&config);
    let registry = state.registry.clone();

    let maintenance_handle = spawn_maintenance_task(registry.clone(), config.maintenance_interval);
    info!("Maintenance task started");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", addr);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    maintenance_handle.abort();
    warn!("Maintenance task aborted");
    registry.shutdown().await;

    if let Err(err) = &served {
        error!("Server error: {}", err);
    }
    info!("Server shutdown complete");
    served.map_err(Into::into)
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
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
}
