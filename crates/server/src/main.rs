mod bootstrap;
mod health;
mod routes;

use std::time::Duration;

use anyhow::Result;
use awaybot_core::config::{AppConfig, LoadOptions};

fn init_logging(config: &AppConfig) {
    use awaybot_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Load config and initialize logging before any other operations
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    // Now bootstrap using the same config we already loaded
    let app = bootstrap::bootstrap_with_config(config).await?;

    let address = format!("{}:{}", app.config.server.bind_address, app.config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    let shutdown_grace = Duration::from_secs(app.config.server.graceful_shutdown_secs);

    let router = routes::router(app.dispatcher.clone()).merge(health::router());

    tracing::info!(
        event_name = "system.server.started",
        request_id = "bootstrap",
        bind_address = %address,
        "awaybot-server listening"
    );

    axum::serve(listener, router).with_graceful_shutdown(wait_for_shutdown(shutdown_grace)).await?;

    tracing::info!(
        event_name = "system.server.stopping",
        request_id = "shutdown",
        "awaybot-server stopping"
    );

    Ok(())
}

async fn wait_for_shutdown(grace: Duration) {
    if tokio::signal::ctrl_c().await.is_err() {
        return;
    }
    tracing::info!(
        event_name = "system.server.shutdown_signal",
        request_id = "shutdown",
        grace_secs = grace.as_secs(),
        "shutdown signal received, draining in-flight requests"
    );

    // Hard deadline for the drain.
    tokio::spawn(async move {
        tokio::time::sleep(grace).await;
        tracing::warn!(
            event_name = "system.server.shutdown_forced",
            request_id = "shutdown",
            "drain deadline elapsed, exiting"
        );
        std::process::exit(1);
    });
}
