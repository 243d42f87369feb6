// HTTP API - thin axum handlers over the services

pub mod assets;
pub mod multipart;
pub mod pages;
pub mod sections;

use axum::{extract::DefaultBodyLimit, Router};
use tower_http::services::ServeDir;

use crate::app_state::AppState;

/// Files a single multipart request may reasonably carry at the per-file size limit
const MAX_FILES_PER_REQUEST: usize = 20;

pub fn router(state: AppState) -> Router {
    let uploads_dir = state.config.uploads.uploads_dir();
    let body_limit = state
        .config
        .uploads
        .max_file_size
        .saturating_mul(MAX_FILES_PER_REQUEST);

    Router::new()
        .nest("/api/pages", pages::routes())
        .nest("/api/sections", sections::routes())
        .nest("/api/assets", assets::routes())
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
