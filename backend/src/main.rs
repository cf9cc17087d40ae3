//! coins service entry point.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Parser;
use coins_backend::config::{Config, METRIC_PREFIX};
use coins_backend::domain::{build_service, PaymentMetrics};
use coins_backend::io::Server;
use coins_backend::storage::{DbConnection, PostgresStorage};
use prometheus::Registry;
use shared::{CancelHandle, Context};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() {
    let config = Config::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let (ctx, cancel) = Context::background().with_cancel();
    tokio::spawn(cancel_on_signal(cancel));

    info!("Service is starting");
    if let Err(e) = run(config, ctx).await {
        error!("Service is stopped with error: {:#}", e);
        std::process::exit(1);
    }
    info!("Service is stopped");
}

async fn run(config: Config, ctx: Context) -> Result<()> {
    let db = DbConnection::new(&config.postgres()).context("failed to initialize storage")?;
    let storage = PostgresStorage::new(db);

    let registry = Registry::new();
    let metrics = PaymentMetrics::new(METRIC_PREFIX, &registry)
        .context("failed to register metrics")?;
    let service = build_service(storage.clone(), metrics);

    let server_config = config.server();
    info!("Starting http server on port {}", server_config.port);
    let result = Server::new(server_config, Arc::new(service), registry)
        .serve(ctx)
        .await
        .context("failed to serve http");

    storage.close().await;
    result
}

/// Cancel the root context on SIGINT or SIGTERM.
async fn cancel_on_signal(cancel: CancelHandle) {
    match wait_for_signal().await {
        Ok(signal) => info!("Received {}", signal),
        Err(e) => error!("Failed to listen for signals: {:#}", e),
    }
    cancel.cancel();
}

#[cfg(unix)]
async fn wait_for_signal() -> Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate()).context("failed to install SIGTERM handler")?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result.context("failed to install SIGINT handler")?;
            Ok("SIGINT")
        }
        _ = terminate.recv() => Ok("SIGTERM"),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .context("failed to install Ctrl-C handler")?;
    Ok("Ctrl-C")
}
