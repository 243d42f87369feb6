// Asset routes

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;

use super::multipart::read_form;
use crate::app_state::AppState;
use crate::core::AssetId;
use crate::error::AppResult;
use crate::models::{Asset, CreateAsset, UpdateAsset};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_assets).post(create_asset))
        .route("/upload", post(upload_assets))
        .route("/type/{asset_type}", get(assets_by_type))
        .route("/{id}", get(get_asset).put(update_asset).delete(delete_asset))
}

#[derive(Debug, Deserialize)]
struct AssetFilter {
    #[serde(rename = "type")]
    asset_type: Option<String>,
}

async fn list_assets(
    State(state): State<AppState>,
    Query(filter): Query<AssetFilter>,
) -> AppResult<Json<Vec<Asset>>> {
    let assets = match filter.asset_type {
        Some(asset_type) => state.assets.find_by_type(&asset_type).await?,
        None => state.assets.find_all().await?,
    };
    Ok(Json(assets))
}

async fn create_asset(
    State(state): State<AppState>,
    Json(input): Json<CreateAsset>,
) -> AppResult<(StatusCode, Json<Asset>)> {
    let asset = state.assets.create(input).await?;
    Ok((StatusCode::CREATED, Json(asset)))
}

/// Every file part becomes one asset; an `uploadedBy` text part is applied to all of them
async fn upload_assets(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<Vec<Asset>>)> {
    let form = read_form(multipart).await?;
    let uploaded_by = form.fields.non_empty("uploadedBy").map(str::to_string);
    let assets = state.assets.upload(form.files, uploaded_by).await?;
    Ok((StatusCode::CREATED, Json(assets)))
}

async fn assets_by_type(
    State(state): State<AppState>,
    Path(asset_type): Path<String>,
) -> AppResult<Json<Vec<Asset>>> {
    Ok(Json(state.assets.find_by_type(&asset_type).await?))
}

async fn get_asset(
    State(state): State<AppState>,
    Path(id): Path<AssetId>,
) -> AppResult<Json<Asset>> {
    Ok(Json(state.assets.find_one(id).await?))
}

async fn update_asset(
    State(state): State<AppState>,
    Path(id): Path<AssetId>,
    Json(changes): Json<UpdateAsset>,
) -> AppResult<Json<Asset>> {
    Ok(Json(state.assets.update(id, changes).await?))
}

async fn delete_asset(
    State(state): State<AppState>,
    Path(id): Path<AssetId>,
) -> AppResult<Json<Asset>> {
    Ok(Json(state.assets.delete(id).await?))
}
