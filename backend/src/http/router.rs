//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // Permissive CORS; the dashboards are served from other origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Datasets
        .route("/datasets", get(handlers::list_datasets))
        .route("/upload", post(handlers::upload_dataset))
        .route("/datasets/{dataset_id}", get(handlers::get_dataset))
        .route("/datasets/{dataset_id}/analytics", get(handlers::get_dataset_analytics))
        .route("/datasets/{dataset_id}/report", get(handlers::get_dataset_report))
        // Equipment rows
        .route("/equipment", get(handlers::list_equipment))
        .route(
            "/equipment/{equipment_id}",
            get(handlers::get_equipment)
                .put(handlers::update_equipment)
                .patch(handlers::update_equipment)
                .delete(handlers::delete_equipment),
        );

    let body_limit = state.max_upload_bytes;

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
