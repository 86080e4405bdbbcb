//! HTTP serving layer for the IPCA long table.
//!
//! A single read-only endpoint that re-reads the table written by the ETL
//! and returns it as JSON.

pub mod handlers;
pub mod router;

pub use ipca_core as core;
pub use ipca_data as data;

use ipca_core::error::Result;
use ipca_core::settings::ServerConfig;
use tracing::info;

/// Bind `config.bind` and serve until Ctrl+C.
pub async fn serve(config: ServerConfig) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!(
        "Serving {} on http://{}",
        config.output_path.display(),
        listener.local_addr()?
    );

    axum::serve(listener, router::app_router(&config))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Ctrl+C received; shutting down");
}
