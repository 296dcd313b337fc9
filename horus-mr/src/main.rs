//! horus-mr (Match Records) - Main entry point
//!
//! Receives scouting match records from browser clients and stores each one
//! as a JSON document under the storage root.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use horus_common::config::{CliOverrides, ServiceConfig};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use horus_mr::api::ENDPOINTS;
use horus_mr::{build_router, AppState, FileRecordStore, RecordStore};

/// Command-line arguments for horus-mr
#[derive(Parser, Debug)]
#[command(name = "horus-mr")]
#[command(about = "Horus Match Records API server")]
#[command(version)]
struct Args {
    /// Address to bind (overrides HORUS_HOST and config file)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides HORUS_PORT and config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory holding one JSON file per record (overrides HORUS_DATA_DIR)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// TOML config file (default: <config dir>/horus/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl From<Args> for CliOverrides {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            data_dir: args.data_dir,
            config_file: args.config,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "horus_mr=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting Horus Match Records API Server (horus-mr) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let overrides: CliOverrides = Args::parse().into();
    let config = ServiceConfig::resolve(&overrides).context("Failed to resolve configuration")?;

    let store = FileRecordStore::new(config.data_dir.clone());
    store
        .init()
        .await
        .context("Failed to initialize record storage")?;
    info!("Record storage: {}", store.root().display());

    let app = build_router(AppState::new(Arc::new(store)));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Server will be available at: http://{}", addr);
    info!("API endpoints:");
    for (route, description) in ENDPOINTS {
        info!("  {} - {}", route, description);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
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
