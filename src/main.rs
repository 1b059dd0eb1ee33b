//! Area Material - Material You theming daemon
//!
//! Reads JSON-lines events on stdin and keeps the desktop theme in sync with
//! the wallpaper, dark mode and scheme variant. Every published theme and
//! requested stats snapshot is written to stdout as a JSON line.

mod config;
mod events;
mod material;
mod state;

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use material::service::MaterialService;
use state::StateStore;

/// Events waiting for the service before stdin is back-pressured
const EVENT_QUEUE: usize = 32;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "area_material=debug,info".into()),
        ))
        // stdout carries the JSON updates
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting Area Material");

    let config = Config::load().context("Failed to load material config")?;
    let store = StateStore::default_location()?;
    info!("State file: {:?}", store.path());
    let service = Arc::new(MaterialService::new(config, store)?);

    // Setup signal handlers for graceful shutdown
    let (shutdown_tx, mut shutdown_rx) = tokio::sync::mpsc::channel::<()>(1);

    // Handle SIGTERM and SIGINT
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;
        let tx = shutdown_tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, shutting down gracefully");
                    let _ = tx.send(()).await;
                }
                _ = sigint.recv() => {
                    info!("Received SIGINT, shutting down gracefully");
                    let _ = tx.send(()).await;
                }
            }
        });
    }

    // Event intake: the service stops once stdin closes
    let (event_tx, event_rx) = tokio::sync::mpsc::channel(EVENT_QUEUE);
    tokio::spawn(async move {
        if let Err(e) = events::read_events(BufReader::new(tokio::io::stdin()), event_tx).await {
            error!("Event reader failed: {:#}", e);
        }
    });

    // Output: consumers of the published colors read stdout
    let writer = tokio::spawn(events::write_updates(
        tokio::io::stdout(),
        service.subscribe(),
        service.subscribe_stats(),
    ));

    tokio::select! {
        _ = service.clone().run(event_rx) => {
            info!("Input closed, exiting");
        }
        _ = shutdown_rx.recv() => {
            info!("Shutdown signal received, cleaning up...");
        }
    }

    if let Some(theme) = service.current() {
        info!(
            "Last theme: {} ({}, dark_mode={})",
            theme.wallpaper.display(),
            theme.variant,
            theme.dark_mode
        );
    }

    // Dropping the service closes the update channels so the writer drains and exits
    drop(service);
    match writer.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!("Update writer failed: {:#}", e),
        Err(e) => error!("Update writer task failed: {}", e),
    }
    Ok(())
}
