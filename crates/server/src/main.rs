use std::sync::Arc;

use anyhow::Context;
use server::{AppState, config::ServerConfig, routes};
use services::services::scrollrack::ScrollrackClient;
use tokio::net::TcpListener;
use tracing::info;
use utils::logging::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing("info,server=debug,services=debug");

    let config = ServerConfig::from_env()?;
    let client = ScrollrackClient::new(&config.scrollrack)?;
    info!(
        endpoint = client.endpoint(),
        timeout_secs = config.scrollrack.timeout.as_secs(),
        "Scrollrack client ready"
    );

    let app = routes::router(AppState::new(Arc::new(client)));

    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", config.host, config.port))?;
    info!("Server running on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
