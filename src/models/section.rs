use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use super::Entity;
use crate::content::SectionContent;
use crate::core::{PageId, SectionId};
use crate::error::AppError;

/// The closed set of section kinds. The tag doubles as the content variant tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionType {
    ImageText,
    Slider,
    Hero,
    TextBlock,
    Gallery,
    ContactForm,
}

impl SectionType {
    pub const ALL: [SectionType; 6] = [
        SectionType::ImageText,
        SectionType::Slider,
        SectionType::Hero,
        SectionType::TextBlock,
        SectionType::Gallery,
        SectionType::ContactForm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionType::ImageText => "image-text",
            SectionType::Slider => "slider",
            SectionType::Hero => "hero",
            SectionType::TextBlock => "text-block",
            SectionType::Gallery => "gallery",
            SectionType::ContactForm => "contact-form",
        }
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionType::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| AppError::Validation(format!("Unsupported section type: {}", s)))
    }
}

/// One ordered content block on a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: SectionId,
    #[serde(rename = "type")]
    pub section_type: SectionType,
    pub content: SectionContent,
    pub order: i32,
    pub page_id: PageId,
}

impl Entity for Section {
    type Id = SectionId;
    type Create = NewSection;
    type Update = SectionChanges;
}

/// A section that already passed content validation and is ready to be stored
#[derive(Debug, Clone)]
pub struct NewSection {
    pub content: SectionContent,
    pub order: i32,
    pub page_id: PageId,
}

/// Validated changes to a stored section; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct SectionChanges {
    pub content: Option<SectionContent>,
    pub order: Option<i32>,
    pub page_id: Option<PageId>,
}

/// JSON creation payload; `content` is untyped until validated
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSectionRequest {
    #[serde(rename = "type")]
    pub section_type: SectionType,
    pub content: Value,
    pub order: i32,
    pub page_id: PageId,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSectionRequest {
    #[serde(rename = "type", default)]
    pub section_type: Option<SectionType>,
    #[serde(default)]
    pub content: Option<Value>,
    #[serde(default)]
    pub order: Option<i32>,
    #[serde(default)]
    pub page_id: Option<PageId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_type_tags() {
        for section_type in SectionType::ALL {
            let json = serde_json::to_value(section_type).unwrap();
            assert_eq!(json, Value::String(section_type.as_str().to_string()));
            assert_eq!(section_type.as_str().parse::<SectionType>().unwrap(), section_type);
        }
    }

    #[test]
    fn test_unknown_section_type_is_rejected() {
        let err = "carousel".parse::<SectionType>().unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
