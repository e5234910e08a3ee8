use anyhow::Result;
use tokio::net::TcpListener;
use tracing::{debug, error, info, trace};

use crate::config::initialize_app_state_with_url;
use crate::router::create_router;

pub async fn serve(database_url: &str, bind_address: &str) -> Result<()> {
    info!("League manager starting up");
    debug!("Database URL: {}", database_url);

    let state = initialize_app_state_with_url(database_url).await.map_err(|e| {
        error!("Failed to initialize application state: {}", e);
        e
    })?;
    debug!(
        rng_seed = ?state.settings.rng_seed,
        timeout_secs = state.settings.request_timeout_secs,
        "Application state initialized"
    );

    let app = create_router(state);

    trace!("Attempting to bind TCP listener to {}", bind_address);
    let listener = TcpListener::bind(bind_address).await.map_err(|e| {
        error!("Failed to bind to address {}: {}", bind_address, e);
        e
    })?;

    info!("League manager API running on http://{}", bind_address);
    info!("Swagger UI available at http://{}/swagger-ui", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("Server error: {}", e);
            e
        })?;

    info!("Server shutdown gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
