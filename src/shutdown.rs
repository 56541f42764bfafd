//! Graceful Shutdown Module
//!
//! Signal handling for the HTTP server plus a bounded drain period.

use std::future::Future;
use std::time::Duration;

use tokio::signal;
use tracing::{error, info, warn};

/// Waits for SIGTERM or SIGINT
pub async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
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
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown");
        }
    }
}

/// Runs a server future that stops accepting on `wait_for_signal`,
/// giving in-flight requests at most `drain_timeout` once the signal fires.
pub async fn run_with_graceful_shutdown<F, E>(
    server_future: F,
    shutdown_started: tokio::sync::watch::Receiver<bool>,
    drain_timeout: Duration,
) where
    F: Future<Output = Result<(), E>> + Send,
    E: std::fmt::Display,
{
    let mut shutdown_started = shutdown_started;
    tokio::pin!(server_future);

    tokio::select! {
        result = &mut server_future => {
            log_server_result(result);
            return;
        }
        _ = shutdown_started.wait_for(|started| *started) => {}
    }

    match tokio::time::timeout(drain_timeout, server_future).await {
        Ok(result) => {
            log_server_result(result);
            info!("All connections drained");
        }
        Err(_) => warn!(
            timeout_secs = drain_timeout.as_secs(),
            "Shutdown timeout reached, abandoning in-flight requests"
        ),
    }
}

fn log_server_result<E: std::fmt::Display>(result: Result<(), E>) {
    match result {
        Ok(()) => info!("Server stopped normally"),
        Err(e) => error!(error = %e, "Server error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::watch;

    #[tokio::test]
    async fn test_server_finishing_first_returns() {
        let (_tx, rx) = watch::channel(false);
        let server = async { Ok::<(), std::io::Error>(()) };

        run_with_graceful_shutdown(server, rx, Duration::from_secs(1)).await;
    }

    #[tokio::test]
    async fn test_drain_is_bounded() {
        let (tx, rx) = watch::channel(false);
        let server = async {
            std::future::pending::<()>().await;
            Ok::<(), std::io::Error>(())
        };

        tx.send(true).unwrap();
        let started = std::time::Instant::now();
        run_with_graceful_shutdown(server, rx, Duration::from_millis(50)).await;

        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
