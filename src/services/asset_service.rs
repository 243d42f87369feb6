// Asset Service - the media catalog and direct uploads into it

use std::sync::Arc;
use tracing::{debug, info};

use super::asset_lifecycle::{extract_file_refs, AssetLifecycle};
use crate::core::AssetId;
use crate::error::{AppError, AppResult};
use crate::infrastructure::repository::{AssetRepository, SectionRepository};
use crate::infrastructure::uploads::{asset_type_for, IncomingFile, UploadStore};
use crate::models::{Asset, AssetType, CreateAsset, UpdateAsset};

#[derive(Clone)]
pub struct AssetService {
    assets: Arc<dyn AssetRepository>,
    sections: Arc<dyn SectionRepository>,
    uploads: UploadStore,
    lifecycle: AssetLifecycle,
}

impl AssetService {
    pub fn new(
        assets: Arc<dyn AssetRepository>,
        sections: Arc<dyn SectionRepository>,
        uploads: UploadStore,
        lifecycle: AssetLifecycle,
    ) -> Self {
        Self {
            assets,
            sections,
            uploads,
            lifecycle,
        }
    }

    /// Newest first
    pub async fn find_all(&self) -> AppResult<Vec<Asset>> {
        self.assets.find_all().await
    }

    pub async fn find_one(&self, id: AssetId) -> AppResult<Asset> {
        self.assets
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Asset with ID {} not found", id)))
    }

    pub async fn find_by_type(&self, asset_type: &str) -> AppResult<Vec<Asset>> {
        let asset_type: AssetType = asset_type.parse()?;
        self.assets.find_by_type(asset_type).await
    }

    pub async fn create(&self, input: CreateAsset) -> AppResult<Asset> {
        if input.url.trim().is_empty() {
            return Err(AppError::Validation("Asset url must not be empty".to_string()));
        }
        let asset = self.assets.create(input).await?;
        info!("Catalogued asset {} ({})", asset.id, asset.url);
        Ok(asset)
    }

    pub async fn update(&self, id: AssetId, changes: UpdateAsset) -> AppResult<Asset> {
        self.find_one(id).await?;
        self.assets
            .update(id, changes)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Asset with ID {} not found", id)))
    }

    /// Store uploaded media and catalog one asset per file
    pub async fn upload(
        &self,
        files: Vec<IncomingFile>,
        uploaded_by: Option<String>,
    ) -> AppResult<Vec<Asset>> {
        if files.is_empty() {
            return Err(AppError::Validation("No file uploaded".to_string()));
        }

        let stored = self.uploads.persist(files).await?;

        let mut assets = Vec::with_capacity(stored.len());
        for file in &stored {
            let created = self
                .assets
                .create(CreateAsset {
                    url: file.url(),
                    asset_type: asset_type_for(&file.filename),
                    filename: file.filename.clone(),
                    uploaded_by: uploaded_by.clone(),
                })
                .await;

            match created {
                Ok(asset) => assets.push(asset),
                Err(e) => {
                    // Files without a catalog row would be unreachable
                    for asset in &assets {
                        self.assets.delete(asset.id).await.ok();
                    }
                    self.lifecycle.discard_uploads(&stored).await;
                    return Err(e);
                }
            }
        }

        info!("Uploaded {} asset(s)", assets.len());
        Ok(assets)
    }

    /// Removes the catalog row. The file itself goes only when no section content
    /// still references the asset url.
    pub async fn delete(&self, id: AssetId) -> AppResult<Asset> {
        let asset = self.find_one(id).await?;
        if !self.assets.delete(id).await? {
            return Err(AppError::NotFound(format!("Asset with ID {} not found", id)));
        }

        let referenced = self
            .sections
            .find_all()
            .await?
            .iter()
            .any(|s| extract_file_refs(&s.content).contains(&asset.url));

        if referenced {
            debug!("Keeping file {} of deleted asset {}: still referenced", asset.url, asset.id);
        } else {
            self.lifecycle.delete_files(std::slice::from_ref(&asset.url)).await;
        }

        info!("Deleted asset {}", asset.id);
        Ok(asset)
    }
}
