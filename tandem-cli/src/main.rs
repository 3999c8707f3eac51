mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use tandem::server::{InMemoryUserDirectory, RelayHandle, RelayService, UserDirectory, app};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    info!("Initializing signaling relay...");

    let directory: Option<Arc<dyn UserDirectory>> = if cli.users.is_empty() {
        None
    } else {
        info!("Identity binding enabled for {} users", cli.users.len());
        Some(Arc::new(InMemoryUserDirectory::with_users(cli.users.clone())))
    };

    let (relay, relay_task) = RelayService::spawn(cli.relay_config(), directory);

    let addr = cli.addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Signaling relay listening on ws://{}/ws", addr);

    axum::serve(listener, app(relay.clone()))
        .with_graceful_shutdown(shutdown_signal(relay))
        .await
        .context("HTTP server failed")?;

    relay_task.await.context("Relay task panicked")?;
    info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal(relay: RelayHandle) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
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
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Termination signal received, closing all connections");
    if let Err(e) = relay.shutdown().await {
        warn!("Relay already stopped: {}", e);
    }
}
