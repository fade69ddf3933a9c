use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use super::{artifacts, documents, handlers, middleware::metrics_middleware};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let max_body_bytes = state.config().server.max_body_bytes;
    let static_dir = state.config().server.static_dir.clone();

    // API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Upload slot and conversion
        .route("/upload", post(documents::upload))
        .route("/document", get(documents::current_document))
        .route("/convert", post(documents::convert))
        // Output artifacts
        .route("/files", get(artifacts::list_files))
        .route("/download/{name}", get(artifacts::download_file))
        .route("/download-zip", get(artifacts::download_zip))
        .route("/clear", post(artifacts::clear_files))
        .route("/stats", get(artifacts::get_stats))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state);

    let router = Router::new()
        .nest("/api", api_routes)
        .route("/metrics", get(handlers::metrics))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http());

    // Presentation layer with SPA fallback, if configured
    match static_dir {
        Some(dir) => {
            let index_path = dir.join("index.html");
            router.fallback_service(ServeDir::new(&dir).fallback(ServeFile::new(index_path)))
        }
        None => router,
    }
}
