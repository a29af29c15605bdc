use super::handlers;
use super::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

// Audio uploads can be several MB; raise the default extractor cap.
// 64 MiB supports long recordings without being unbounded.
const UPLOAD_LIMIT_BYTES: usize = 64 * 1024 * 1024;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Upload and listing
        .route(
            "/clips",
            get(handlers::list_clips).post(handlers::upload_clip),
        )
        // Clip queries and processing
        .route("/clips/:clip_id", get(handlers::get_clip))
        .route("/clips/:clip_id/process", post(handlers::process_clip))
        // Dataset browser page
        .fallback_service(ServeDir::new("static"))
        .layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES))
        // Browser pages served elsewhere still need to reach the API
        .layer(CorsLayer::permissive())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
