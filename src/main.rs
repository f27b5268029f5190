//! item-lookup - HTTP facade over the Product Advertising API
//!
//! Looks up a single ASIN per request, normalizes the result into a flat JSON
//! record and optionally keeps a copy of every record on disk.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use item_lookup::catalog::PaapiClient;
use item_lookup::cli::{Cli, ServiceConfig};
use item_lookup::server;
use item_lookup::service::LookupService;

/// Installs the global tracing subscriber
///
/// `RUST_LOG` overrides the default of `info` for this crate.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("item_lookup=info,warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Resolves when the process is asked to stop
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
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
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine; flags and the environment still apply
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = ServiceConfig::from_cli(&cli);

    let catalog = PaapiClient::new(config.credentials.clone(), &config.locale)?;
    let service = LookupService::new(
        Arc::new(catalog),
        config.cache.clone(),
        config.response_group,
    );

    match &config.cache {
        Some(cache) => info!(cache_dir = %cache.cache_dir().display(), "caching enabled"),
        None => info!("caching disabled"),
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!(
        port = config.port,
        domain = config.locale.code,
        response_group = %config.response_group,
        "Starting Server"
    );

    axum::serve(listener, server::router(service.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shutting down, waiting for pending cache writes");
    service.flush_cache_writes().await;

    Ok(())
}
