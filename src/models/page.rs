use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{deserialize_some, Entity, Section};
use crate::core::PageId;

/// A node in the page tree. Children are derived from other pages' `parent_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: PageId,
    pub title: String,
    pub slug: String,
    pub parent_id: Option<PageId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Page {
    type Id = PageId;
    type Create = CreatePage;
    type Update = UpdatePage;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePage {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub parent_id: Option<PageId>,
}

/// `parent_id: Some(None)` moves the page to the root set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePage {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub parent_id: Option<Option<PageId>>,
}

/// A page together with its relations and externally visible path
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDetails {
    #[serde(flatten)]
    pub page: Page,
    pub full_path: String,
    pub parent: Option<Page>,
    pub children: Vec<Page>,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageTreeNode {
    #[serde(flatten)]
    pub page: Page,
    pub full_path: String,
    pub children: Vec<PageTreeNode>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_page_distinguishes_null_parent() {
        let absent: UpdatePage = serde_json::from_str(r#"{"title":"About"}"#).unwrap();
        assert_eq!(absent.parent_id, None);

        let to_root: UpdatePage = serde_json::from_str(r#"{"parentId":null}"#).unwrap();
        assert_eq!(to_root.parent_id, Some(None));

        let moved: UpdatePage = serde_json::from_str(r#"{"parentId":"12"}"#).unwrap();
        assert_eq!(moved.parent_id, Some(Some(PageId::new(12))));
    }
}
