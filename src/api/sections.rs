// Section routes

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};

use super::multipart::read_form;
use crate::app_state::AppState;
use crate::content::SectionTypeInfo;
use crate::core::{PageId, SectionId};
use crate::error::AppResult;
use crate::models::{CreateSectionRequest, Section, UpdateSectionRequest};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sections).post(create_section_form))
        .route("/json", post(create_section_json))
        .route("/types", get(section_types))
        .route("/page/{page_id}", get(sections_by_page))
        .route(
            "/{id}",
            get(get_section).put(update_section_json).delete(delete_section),
        )
        .route("/{id}/form", put(update_section_form))
}

async fn list_sections(State(state): State<AppState>) -> AppResult<Json<Vec<Section>>> {
    Ok(Json(state.sections.find_all().await?))
}

async fn section_types(State(state): State<AppState>) -> Json<Vec<SectionTypeInfo>> {
    Json(state.sections.section_types())
}

async fn create_section_form(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<Section>)> {
    let form = read_form(multipart).await?;
    let section = state.sections.create_from_form(form).await?;
    Ok((StatusCode::CREATED, Json(section)))
}

async fn create_section_json(
    State(state): State<AppState>,
    Json(request): Json<CreateSectionRequest>,
) -> AppResult<(StatusCode, Json<Section>)> {
    let section = state.sections.create(request).await?;
    Ok((StatusCode::CREATED, Json(section)))
}

async fn sections_by_page(
    State(state): State<AppState>,
    Path(page_id): Path<PageId>,
) -> AppResult<Json<Vec<Section>>> {
    Ok(Json(state.sections.find_by_page(page_id).await?))
}

async fn get_section(
    State(state): State<AppState>,
    Path(id): Path<SectionId>,
) -> AppResult<Json<Section>> {
    Ok(Json(state.sections.find_one(id).await?))
}

async fn update_section_json(
    State(state): State<AppState>,
    Path(id): Path<SectionId>,
    Json(request): Json<UpdateSectionRequest>,
) -> AppResult<Json<Section>> {
    Ok(Json(state.sections.update(id, request).await?))
}

async fn update_section_form(
    State(state): State<AppState>,
    Path(id): Path<SectionId>,
    multipart: Multipart,
) -> AppResult<Json<Section>> {
    let form = read_form(multipart).await?;
    Ok(Json(state.sections.update_from_form(id, form).await?))
}

async fn delete_section(
    State(state): State<AppState>,
    Path(id): Path<SectionId>,
) -> AppResult<Json<Section>> {
    Ok(Json(state.sections.delete(id).await?))
}
