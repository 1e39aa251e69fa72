use super::{DashboardState, handlers};
use crate::domain::DomainError;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::info;

pub fn create_router(state: DashboardState) -> Router {
    Router::new()
        // Page
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        // Datasets
        .route("/api/datasets", get(handlers::list_datasets))
        .route("/api/titles", get(handlers::dataset_titles))
        // Analysis
        .route("/api/analyze", post(handlers::analyze))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Bind `addr` and serve the dashboard until Ctrl-C.
pub async fn serve(state: DashboardState, addr: &str) -> Result<(), DomainError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| DomainError::Config(format!("cannot bind {}: {}", addr, e)))?;
    info!(addr, datasets = state.datasets.len(), "dashboard listening on http://{}", addr);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down dashboard");
        })
        .await
        .map_err(|e| DomainError::Ui(format!("dashboard server failed: {}", e)))
}
