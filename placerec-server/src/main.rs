//! placerec-server - Place recommendation aggregation service
//!
//! Accepts place recommendations over HTTP, groups them by
//! `placeName|address` and serves the aggregated reasons to map clients.

use anyhow::{Context, Result};
use clap::Parser;
use placerec_common::config::{load_toml_config_if_present, StoreBackend};
use placerec_server::config::{CliArgs, ServerConfig};
use placerec_server::store::open_store;
use placerec_server::{build_router, AppState};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    // Resolve everything before tracing starts so the file's log level applies;
    // a bad config file is reported once the subscriber is up
    let config_path = args.config_path();
    let toml_result = load_toml_config_if_present(config_path.as_deref());
    let toml_config = toml_result.as_ref().cloned().unwrap_or_default();
    let config = ServerConfig::resolve(args, toml_config);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting placerec-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    match &toml_result {
        Ok(_) => {
            if let Some(path) = config_path.as_deref().filter(|p| p.exists()) {
                info!("Loaded config file: {}", path.display());
            }
        }
        Err(e) => warn!("{} - using defaults", e),
    }

    let router_config = config
        .router_config()
        .context("Invalid CORS configuration")?;
    let addr = config.socket_addr()?;

    info!("Store backend: {}", config.store);
    let store = open_store(config.store, &config.database_path)
        .await
        .with_context(|| format!("Failed to open {} store", config.store))?;
    if config.store == StoreBackend::Sqlite {
        info!("Database: {}", config.database_path.display());
    }
    info!("Allowed origin: {}", config.allowed_origin);
    if let Some(dir) = &config.static_dir {
        info!("Serving static files from {}", dir.display());
    }

    let state = AppState::new(store.clone());
    let app = build_router(state, &router_config);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("placerec-server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error");

    // Listener has drained; release the store whether or not serving failed
    store.close().await;
    served?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
