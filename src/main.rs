//! Auth Service - Main Entry Point
//!
//! Serves login, token verification and health endpoints over HTTP with
//! structured logging and graceful shutdown.

use std::future::IntoFuture;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

use auth_service::observability::{init_tracing, TracingConfig};
use auth_service::shutdown::{run_with_graceful_shutdown, wait_for_signal};
use auth_service::{http, AuthService, Config, CredentialRegistry, TokenCodec};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;

    init_tracing(&TracingConfig::from_config(&config));

    info!("Starting Auth Service");

    let registry = CredentialRegistry::default();
    let codec = TokenCodec::new(&config.signing_secret);
    let service = Arc::new(AuthService::new(registry, codec));

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(address = %addr, "Auth Service listening");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let server = axum::serve(listener, http::create_router(service))
        .with_graceful_shutdown(async move {
            wait_for_signal().await;
            let _ = shutdown_tx.send(true);
        })
        .into_future();

    run_with_graceful_shutdown(server, shutdown_rx, config.shutdown_timeout).await;

    info!("Auth Service stopped");

    Ok(())
}
