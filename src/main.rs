//! # Trainee Gateway
//!
//! Single GraphQL endpoint in front of the user and trainee REST services.
//!
//! ## 🚀 Startup
//!
//! 1.  Read [`GatewayConfig`] from the environment (and `.env`).
//! 2.  Wire the [`GatewaySystem`]: adapters, event bus, schema.
//! 3.  Serve the listener until `Ctrl-C`.

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use trainee_gateway::lifecycle::{setup_tracing, GatewayConfig, GatewaySystem};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = GatewayConfig::from_env().context("invalid gateway configuration")?;
    let port = config.port;

    let system = GatewaySystem::new(config).context("failed to build backend HTTP client")?;

    let listener = TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("failed to bind port {port}"))?;
    info!(port, "Gateway listening on /graphql");

    axum::serve(listener, system.router())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("listener failed")?;

    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
