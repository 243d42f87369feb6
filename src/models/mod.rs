// Domain models - pages, sections and the asset catalog

pub mod asset;
pub mod page;
pub mod section;

pub use asset::{Asset, AssetType, CreateAsset, UpdateAsset};
pub use page::{CreatePage, Page, PageDetails, PageTreeNode, UpdatePage};
pub use section::{
    CreateSectionRequest, NewSection, Section, SectionChanges, SectionType, UpdateSectionRequest,
};

use serde::{Deserialize, Deserializer};
use std::fmt::{Debug, Display};

/// A persisted record: its id type and the payloads used to create and change it
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Copy + Display + Debug + Send + Sync + 'static;
    type Create: Send + Sync + 'static;
    type Update: Send + Sync + 'static;
}

/// Distinguishes an absent field from an explicit `null` in PATCH-like payloads
pub(crate) fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}
