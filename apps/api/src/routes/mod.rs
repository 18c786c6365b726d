pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::cv::handlers as cv;
use crate::render::handlers as render;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Document store
        .route("/api/v1/cv", get(cv::handle_get_cv))
        .route("/api/v1/cv/actions", post(cv::handle_dispatch))
        .route("/api/v1/cv/completeness", get(cv::handle_completeness))
        .route("/api/v1/cv/drafts/:editor", put(cv::handle_draft))
        .route(
            "/api/v1/cv/skills/suggestions",
            get(cv::handle_skill_suggestions),
        )
        // Preview and export
        .route("/api/v1/render/preview", get(render::handle_preview))
        .route("/api/v1/render/status", get(render::handle_export_status))
        .route("/api/v1/render/export", post(render::handle_export))
        .with_state(state)
}
