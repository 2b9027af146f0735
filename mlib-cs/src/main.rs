//! mlib-cs (Catalog Service) - song catalog HTTP service
//!
//! Startup order: config, logging, build identification, database (with
//! retry), schema bootstrap, song info client, HTTP server.

use anyhow::{Context, Result};
use clap::Parser;
use mlib_common::config::{load_config, resolve_config_path, ConfigSource};
use mlib_common::db::{connect_with_retry, init_schema};
use mlib_common::logging::init_logging;
use mlib_cs::song_info::HttpSongInfoClient;
use mlib_cs::{build_router, AppState, CatalogService};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{info, warn};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "mlib-cs")]
#[command(about = "Song catalog service", long_about = None)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, env = "MLIB_CONFIG")]
    config: Option<PathBuf>,

    /// HTTP port, overrides [http_server].port
    #[arg(short, long, env = "MLIB_CS_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = resolve_config_path(args.config.as_deref());
    let (mut config, source) =
        load_config(config_path.as_deref()).context("Failed to load config")?;
    config
        .database
        .apply_env_overrides()
        .context("Invalid database environment")?;
    if let Some(port) = args.port {
        config.http_server.port = port;
    }

    init_logging(config.env, &config.logging).context("Failed to initialize logging")?;

    // Build identification right after tracing init, before any database delay
    info!(
        "Starting mlib-cs v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    match &source {
        ConfigSource::File(path) => info!("Config loaded from {}", path.display()),
        ConfigSource::Defaults => warn!("No config file found, using compiled defaults"),
    }
    info!(
        env = ?config.env,
        database = %config.database.display_target(),
        "Configuration resolved"
    );

    let pool = connect_with_retry(&config.database)
        .await
        .context("Failed to connect to database")?;
    init_schema(&pool).await.context("Failed to initialize schema")?;

    let lookup = HttpSongInfoClient::from_config(&config.song_info)
        .context("Failed to create song info client")?;
    info!("Song info service: {}", lookup.info_url());

    let catalog = CatalogService::new(pool.clone(), Arc::new(lookup));
    let request_timeout = Duration::from_millis(config.http_server.request_timeout_ms);
    let state = AppState::new(catalog, request_timeout);
    let app = build_router(state);

    let addr = config.http_server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("mlib-cs listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    pool.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
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
