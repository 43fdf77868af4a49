use tracing::{error, info};

use crate::router::app_router;
use crate::state::AppState;

/// Serve the site until Ctrl-C.
pub async fn start_server(state: AppState, bind_addr: &str) -> anyhow::Result<()> {
    let app = app_router(state);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;

    info!("Fyyur listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Fyyur stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}
