pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    response::Html,
    routing::{get, post},
    Router,
};

use crate::cv::handlers;
use crate::state::AppState;

/// Upload page with the sandboxed preview and browser-side PDF export.
const INDEX_HTML: &str = include_str!("../../static/index.html");

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health::health_handler))
        // CV API
        .route("/api/v1/cv/process", post(handlers::handle_process))
        .route("/api/v1/cv/render", post(handlers::handle_render))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
