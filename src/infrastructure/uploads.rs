// Uploads - naming, filtering and storing incoming multipart files

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use super::file_store::FileStore;
use crate::error::{AppError, AppResult};
use crate::models::AssetType;

pub const UPLOADS_DIR: &str = "uploads";

static IMAGE_EXTENSIONS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(jpg|jpeg|png|gif|webp)$").expect("valid regex"));
static VIDEO_EXTENSIONS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(mp4|webm|ogg|avi|mov)$").expect("valid regex"));
static UNSAFE_NAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_-]+").expect("valid regex"));

/// A file part as handed over by the multipart parser
#[derive(Debug, Clone)]
pub struct IncomingFile {
    /// Form field the file was sent under, e.g. `images`
    pub field_name: String,
    pub original_name: String,
    pub data: Vec<u8>,
}

/// A file that has been written to the uploads directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub field_name: String,
    pub original_name: String,
    /// Generated name on disk
    pub filename: String,
    pub size: u64,
}

impl UploadedFile {
    pub fn url(&self) -> String {
        file_url(&self.filename)
    }
}

/// Site-relative reference stored in section content and the asset catalog
pub fn file_url(filename: &str) -> String {
    format!("/{}/{}", UPLOADS_DIR, filename)
}

/// `<stem>-<uuid><ext>`, where the stem is the original name up to its first dot
pub fn stored_filename(original_name: &str) -> String {
    let base = Path::new(original_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();

    let stem = base.split('.').next().unwrap_or_default();
    let stem = UNSAFE_NAME_CHARS.replace_all(stem, "-");
    let stem = stem.trim_matches('-');
    let stem = if stem.is_empty() { "upload" } else { stem };

    let extension = Path::new(base)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| UNSAFE_NAME_CHARS.replace_all(e, "").to_lowercase())
        .filter(|e| !e.is_empty())
        .map(|e| format!(".{}", e))
        .unwrap_or_default();

    format!("{}-{}{}", stem, Uuid::new_v4(), extension)
}

/// Classify a file by its extension
pub fn asset_type_for(filename: &str) -> AssetType {
    if IMAGE_EXTENSIONS.is_match(filename) {
        AssetType::Image
    } else if VIDEO_EXTENSIONS.is_match(filename) {
        AssetType::Video
    } else {
        AssetType::File
    }
}

/// Uploads are limited to images and videos
pub fn is_media(original_name: &str) -> bool {
    IMAGE_EXTENSIONS.is_match(original_name) || VIDEO_EXTENSIONS.is_match(original_name)
}

/// Checks and writes incoming files into the uploads directory
#[derive(Clone)]
pub struct UploadStore {
    files: Arc<dyn FileStore>,
    max_file_size: usize,
}

impl UploadStore {
    pub fn new(files: Arc<dyn FileStore>, max_file_size: usize) -> Self {
        Self {
            files,
            max_file_size,
        }
    }

    fn check(&self, file: &IncomingFile) -> AppResult<()> {
        if file.original_name.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "File sent as '{}' has no file name",
                file.field_name
            )));
        }
        if !is_media(&file.original_name) {
            return Err(AppError::Validation(format!(
                "Only image and video files are allowed! ({})",
                file.original_name
            )));
        }
        if file.data.len() > self.max_file_size {
            return Err(AppError::Validation(format!(
                "File '{}' exceeds the {} byte upload limit",
                file.original_name, self.max_file_size
            )));
        }
        Ok(())
    }

    /// Store every file or none: all files are checked before anything is written,
    /// and files already written are removed again if a later write fails.
    pub async fn persist(&self, incoming: Vec<IncomingFile>) -> AppResult<Vec<UploadedFile>> {
        for file in &incoming {
            self.check(file)?;
        }

        let mut stored = Vec::with_capacity(incoming.len());
        for file in incoming {
            let filename = stored_filename(&file.original_name);
            if let Err(e) = self.files.save(&filename, &file.data).await {
                self.rollback(&stored).await;
                return Err(AppError::StorageError(format!(
                    "Failed to store upload '{}': {}",
                    file.original_name, e
                )));
            }

            info!("Stored upload {} as {}", file.original_name, filename);
            stored.push(UploadedFile {
                field_name: file.field_name,
                original_name: file.original_name,
                filename,
                size: file.data.len() as u64,
            });
        }

        Ok(stored)
    }

    async fn rollback(&self, stored: &[UploadedFile]) {
        for file in stored {
            if let Err(e) = self.files.remove(&file.url()).await {
                warn!("Failed to roll back upload {}: {}", file.filename, e);
            }
        }
    }
}
