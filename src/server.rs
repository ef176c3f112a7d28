//! HTTP server initialization and runtime setup.
//!
//! Builds the shared components, spawns the background tasks and runs the
//! Axum server until Ctrl+C.

use crate::config::Config;
use crate::domain::click_worker::run_click_worker;
use crate::infrastructure::maintenance::spawn_sweeper;
use crate::infrastructure::persistence::MemoryUrlRepository;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::time::timeout;

/// Upper bound for draining queued clicks after the listener stops.
const CLICK_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - In-memory URL repository
/// - Cache (LRU with TTL, or NullCache when disabled) and rate limiter
/// - Background click worker and maintenance sweeper
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if the listen address is invalid, the bind fails or the
/// server hits a runtime error.
pub async fn run(config: Config) -> Result<()> {
    let repository = Arc::new(MemoryUrlRepository::new());
    let assembly = AppState::assemble(&config, repository.clone());

    let worker = tokio::spawn(run_click_worker(assembly.click_receiver, repository));
    tracing::info!("Click worker started");

    let sweeper = config.sweep_interval().map(|every| {
        tracing::info!(interval_secs = every.as_secs(), "Maintenance sweeper started");
        spawn_sweeper(assembly.cache.clone(), assembly.limiter.clone(), every)
    });

    let app = app_router(assembly.state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    if let Some(sweeper) = sweeper {
        sweeper.abort();
    }

    // The router owned the last senders; the worker exits once the queue drains.
    match timeout(CLICK_DRAIN_TIMEOUT, worker).await {
        Ok(_) => tracing::info!("Click worker drained"),
        Err(_) => tracing::warn!(
            "Click worker did not drain within {}s",
            CLICK_DRAIN_TIMEOUT.as_secs()
        ),
    }

    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => tracing::warn!(
            "Failed to listen for Ctrl+C: {}. Proceeding with shutdown anyway.",
            e
        ),
    }
}
