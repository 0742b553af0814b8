//! Web server using Axum.

use anyhow::{Context, Result};

use super::router::create_app_router;
use super::state::AppState;

/// Run the web server until Ctrl-C.
pub async fn run_server(state: AppState) -> Result<()> {
    let addr = state.settings.bind_addr();
    let app = create_app_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Lead intake API listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
