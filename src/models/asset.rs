use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Entity;
use crate::core::AssetId;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Image,
    Video,
    File,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Image => "image",
            AssetType::Video => "video",
            AssetType::File => "file",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "image" => Ok(AssetType::Image),
            "video" => Ok(AssetType::Video),
            "file" => Ok(AssetType::File),
            other => Err(AppError::Validation(format!("Unknown asset type: {}", other))),
        }
    }
}

/// Catalog entry for an uploaded media file. Not linked to section content references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: AssetId,
    pub url: String,
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_by: Option<String>,
}

impl Entity for Asset {
    type Id = AssetId;
    type Create = CreateAsset;
    type Update = UpdateAsset;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAsset {
    pub url: String,
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    pub filename: String,
    #[serde(default)]
    pub uploaded_by: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAsset {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "type", default)]
    pub asset_type: Option<AssetType>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub uploaded_by: Option<String>,
}
