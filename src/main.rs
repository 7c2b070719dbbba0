//! Event Calendar Service - Binary Entry Point
//!
//! This is the main entry point for the calendar-server binary.

use anyhow::{Context, Result};
use tokio::sync::watch;

use event_calendar::{CalendarServer, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let config = match Config::load() {
        Ok(config) => config,
        // Prints usage for --help/--version and for missing or invalid settings
        Err(e) => e.exit(),
    };
    let shutdown_timeout = config.shutdown_timeout;

    let mut server = CalendarServer::new(config);
    server
        .logger()
        .install_global(log::LevelFilter::Info)
        .context("failed to install logger")?;

    // Ctrl+C / SIGTERM arrive on a signal thread; forward them into the runtime
    let (signal_tx, mut signal_rx) = watch::channel(false);
    ctrlc::set_handler(move || {
        let _ = signal_tx.send(true);
    })
    .context("failed to install signal handler")?;

    let addr = server.bind().await.context("failed to bind HTTP listener")?;
    log::info!("Listening on {}", addr);

    let _ = signal_rx.wait_for(|received| *received).await;

    server
        .shutdown(shutdown_timeout)
        .await
        .context("graceful shutdown failed")?;
    Ok(())
}
