//! Long-running HTTP service exposing the article API.
//!
//! # Usage
//!
//! ```bash
//! ARTICLES_SERVICE_PORT=3200 articles-service
//! ```
//!
//! # Environment Variables
//!
//! - `ARTICLES_LOG`: Set logging level (trace, debug, info, warn, error)
//! - `ARTICLES_DATA_DIR`: Override data directory location
//! - `ARTICLES_SERVICE_PORT`: Port (default: 3200)
//! - `ARTICLES_SERVICE_HOST`: Bind address (default: 127.0.0.1)

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tracing::info;

use articles_lib::{build_environment, init_tracing, interfaces, settings};

async fn run_service() -> Result<()> {
    init_tracing();

    info!("Starting article service v{}", env!("CARGO_PKG_VERSION"));

    let handles = tokio::task::spawn_blocking(build_environment)
        .await
        .context("failed to spawn initialization task")?
        .context("failed to initialize application")?;

    info!("Data directory: {}", handles.data_dir.display());

    let app = interfaces::router(handles.service);

    let (host, port) = settings::service_addr();
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("invalid bind address {host}:{port}"))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!("Article service listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server failed")?;

    info!("Article service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {err}");
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_service().await {
        eprintln!("[articles::service] Service failed: {err:?}");
        std::process::exit(1);
    }
}
