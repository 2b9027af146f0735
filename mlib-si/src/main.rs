//! mlib-si (Song Info) - lookup service stub
//!
//! Listens on the `[song_info]` port of the shared config file.

use anyhow::{Context, Result};
use clap::Parser;
use mlib_common::config::{load_config, resolve_config_path, ConfigSource};
use mlib_common::logging::init_logging;
use mlib_si::{build_router, AppState, Fixtures};
use std::path::PathBuf;
use tokio::signal;
use tracing::{info, warn};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "mlib-si")]
#[command(about = "Song info lookup service", long_about = None)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, env = "MLIB_CONFIG")]
    config: Option<PathBuf>,

    /// TOML file with extra `[[songs]]` entries
    #[arg(short, long, env = "MLIB_SI_FIXTURES")]
    fixtures: Option<PathBuf>,

    /// HTTP port, overrides [song_info].port
    #[arg(short, long, env = "MLIB_SI_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = resolve_config_path(args.config.as_deref());
    let (config, source) = load_config(config_path.as_deref()).context("Failed to load config")?;

    init_logging(config.env, &config.logging).context("Failed to initialize logging")?;
    info!("Starting mlib-si v{}", env!("CARGO_PKG_VERSION"));

    match &source {
        ConfigSource::File(path) => info!("Config loaded from {}", path.display()),
        ConfigSource::Defaults => warn!("No config file found, using compiled defaults"),
    }

    let fixtures = match &args.fixtures {
        Some(path) => Fixtures::with_file(path).context("Failed to load fixtures")?,
        None => Fixtures::builtin(),
    };
    info!("Serving {} songs", fixtures.len());

    let app = build_router(AppState::new(fixtures));

    let port = args.port.unwrap_or(config.song_info.port);
    let addr = format!("{}:{}", config.http_server.host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("mlib-si listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

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
