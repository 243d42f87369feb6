// Page routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};

use crate::app_state::AppState;
use crate::core::PageId;
use crate::error::AppResult;
use crate::models::{CreatePage, Page, PageDetails, PageTreeNode, UpdatePage};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_pages).post(create_page))
        .route("/tree", get(page_tree))
        .route("/roots", get(root_pages))
        .route("/slugs/all", get(all_slugs))
        .route("/paths/all", get(all_paths))
        .route("/slug/{slug}", get(page_by_slug))
        .route("/path/{*path}", get(page_by_path))
        .route("/{id}", get(get_page).put(update_page).delete(delete_page))
        .route("/{id}/children", get(page_children))
}

async fn list_pages(State(state): State<AppState>) -> AppResult<Json<Vec<Page>>> {
    Ok(Json(state.pages.find_all().await?))
}

async fn create_page(
    State(state): State<AppState>,
    Json(input): Json<CreatePage>,
) -> AppResult<(StatusCode, Json<Page>)> {
    let page = state.pages.create(input).await?;
    Ok((StatusCode::CREATED, Json(page)))
}

async fn get_page(
    State(state): State<AppState>,
    Path(id): Path<PageId>,
) -> AppResult<Json<PageDetails>> {
    Ok(Json(state.pages.find_one(id).await?))
}

async fn update_page(
    State(state): State<AppState>,
    Path(id): Path<PageId>,
    Json(changes): Json<UpdatePage>,
) -> AppResult<Json<Page>> {
    Ok(Json(state.pages.update(id, changes).await?))
}

async fn delete_page(
    State(state): State<AppState>,
    Path(id): Path<PageId>,
) -> AppResult<Json<Value>> {
    let cleanup = state.pages.delete(id).await?;
    Ok(Json(json!({
        "id": id,
        "deleted": true,
        "sectionsDeleted": cleanup.sections_deleted,
        "filesDeleted": cleanup.files.deleted,
    })))
}

async fn page_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<PageDetails>> {
    Ok(Json(state.pages.find_root_by_slug(&slug).await?))
}

async fn page_by_path(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> AppResult<Json<PageDetails>> {
    Ok(Json(state.pages.find_by_path(&path).await?))
}

async fn all_slugs(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    Ok(Json(state.pages.all_slugs().await?))
}

async fn all_paths(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    Ok(Json(state.pages.all_paths().await?))
}

async fn page_tree(State(state): State<AppState>) -> AppResult<Json<Vec<PageTreeNode>>> {
    Ok(Json(state.pages.tree().await?))
}

async fn root_pages(State(state): State<AppState>) -> AppResult<Json<Vec<Page>>> {
    Ok(Json(state.pages.root_pages().await?))
}

async fn page_children(
    State(state): State<AppState>,
    Path(id): Path<PageId>,
) -> AppResult<Json<Vec<Page>>> {
    Ok(Json(state.pages.children(id).await?))
}
