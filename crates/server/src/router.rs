use super::{handlers, state::AppState};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Creates the Axum router with all the application routes.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health_check))
        .route("/extract", post(handlers::extract))
        .route("/runs/{id}", get(handlers::show_run))
        .route("/runs/{id}/export/{format}", get(handlers::download_export))
        .route("/api/board-id", get(handlers::board_id_preview))
        .route("/api/usage", get(handlers::usage))
        .route("/api/endpoints", get(handlers::endpoints))
        .route("/api/runs/{id}", get(handlers::run_json))
        .route("/api/runs/{id}/preview", get(handlers::export_preview))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}
