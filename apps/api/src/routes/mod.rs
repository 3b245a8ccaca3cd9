pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as api;
use crate::state::AppState;
use crate::web::handlers as pages;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.request_body_limit();

    Router::new()
        .route("/health", get(health::health_handler))
        // HTML form
        .route("/", get(pages::handle_index))
        .route("/analyze", post(pages::handle_analyze_page))
        .route("/download", post(pages::handle_download))
        // JSON API
        .route("/api/v1/analyze", post(api::handle_analyze))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
