//! LeadBridge - RD Station leads into Pipedrive
//!
//! Main entry point for the HTTP service.

use std::sync::Arc;

use anyhow::Context;
use leadbridge_api::utils::logging::{init_tracing, LogFormat};
use leadbridge_api::{router, AppContext};
use leadbridge_infra::{load_from_env, seed_credentials_from_env};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Read .env before the log format and filter are resolved
    let dotenv = dotenvy::dotenv();

    init_tracing(LogFormat::from_env())?;

    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(err) => warn!(error = %err, "could not load .env file"),
    }

    let config = load_from_env().context("invalid configuration")?;
    let bind_addr = config.bind_addr.clone();

    let context = AppContext::new(config).context("failed to build application context")?;
    let seed = seed_credentials_from_env().context("invalid seed credentials")?;
    context.seed_credentials(seed).await.context("failed to seed credential store")?;

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!(addr = %bind_addr, "LeadBridge listening");

    axum::serve(listener, router(Arc::new(context)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("LeadBridge stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
