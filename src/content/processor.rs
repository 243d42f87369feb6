// Section Content Processor - turns multipart form input into candidate section content
//
// Page-builder forms send positional text fields (`text_1`..`text_5`) whose meaning
// depends on the section type, plus files keyed by role (`image`, `backgroundImage`,
// `images`). The processor only assembles a candidate; `validator::validate` decides
// whether it may be stored.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

use super::types::{
    ContactFormContent, CtaButton, GalleryContent, HeroContent, ImageTextContent, SectionContent,
    SliderContent, TextBlockContent,
};
use crate::error::{AppError, AppResult, FieldViolation};
use crate::infrastructure::uploads::UploadedFile;
use crate::models::SectionType;

pub const ROLE_IMAGE: &str = "image";
pub const ROLE_BACKGROUND_IMAGE: &str = "backgroundImage";
pub const ROLE_IMAGES: &str = "images";

const DEFAULT_GALLERY_LAYOUT: &str = "grid";
const DEFAULT_GALLERY_COLUMNS: u64 = 3;

/// Text parts of a multipart submission
#[derive(Debug, Clone, Default)]
pub struct FormFields {
    values: HashMap<String, String>,
}

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// The raw value, including empty strings
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// The value only when it has non-whitespace content
    pub fn non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|v| !v.trim().is_empty())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Build candidate content for a new section. Image-bearing types fail with
/// `MissingRequiredFile` when their file role has no upload.
pub fn build(
    section_type: SectionType,
    files: &[UploadedFile],
    form: &FormFields,
) -> AppResult<Value> {
    build_candidate(section_type, files, form, None)
}

/// Build candidate content for an update. Every field or file role missing from the
/// request keeps the value stored in `existing`, provided `existing` has the same type.
pub fn build_for_update(
    section_type: SectionType,
    files: &[UploadedFile],
    form: &FormFields,
    existing: &SectionContent,
) -> AppResult<Value> {
    build_candidate(section_type, files, form, Some(existing))
}

fn build_candidate(
    section_type: SectionType,
    files: &[UploadedFile],
    form: &FormFields,
    existing: Option<&SectionContent>,
) -> AppResult<Value> {
    match section_type {
        SectionType::ImageText => {
            let prior = match existing {
                Some(SectionContent::ImageText(c)) => Some(c),
                _ => None,
            };
            image_text(files, form, prior)
        }
        SectionType::Hero => {
            let prior = match existing {
                Some(SectionContent::Hero(c)) => Some(c),
                _ => None,
            };
            hero(files, form, prior)
        }
        SectionType::Gallery => {
            let prior = match existing {
                Some(SectionContent::Gallery(c)) => Some(c),
                _ => None,
            };
            gallery(files, form, prior)
        }
        SectionType::Slider => {
            let prior = match existing {
                Some(SectionContent::Slider(c)) => Some(c),
                _ => None,
            };
            slider(files, form, prior)
        }
        SectionType::TextBlock => {
            let prior = match existing {
                Some(SectionContent::TextBlock(c)) => Some(c),
                _ => None,
            };
            text_block(form, prior)
        }
        SectionType::ContactForm => {
            let prior = match existing {
                Some(SectionContent::ContactForm(c)) => Some(c),
                _ => None,
            };
            contact_form(form, prior)
        }
    }
}

/// JSON object that silently skips absent fields
#[derive(Default)]
struct Candidate {
    fields: Map<String, Value>,
}

impl Candidate {
    fn set(&mut self, key: &str, value: Option<Value>) -> &mut Self {
        if let Some(value) = value {
            self.fields.insert(key.to_string(), value);
        }
        self
    }

    fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

fn json<T: Serialize>(value: &T) -> AppResult<Value> {
    serde_json::to_value(value).map_err(AppError::from)
}

fn json_opt<T: Serialize>(value: Option<&T>) -> AppResult<Option<Value>> {
    value.map(json).transpose()
}

/// Supplied value wins, even when empty; otherwise the prior value
fn text(form: &FormFields, key: &str, prior: Option<&String>) -> Option<Value> {
    form.get(key)
        .map(|v| Value::String(v.to_string()))
        .or_else(|| prior.map(|p| Value::String(p.clone())))
}

/// Like `text`, but an empty submitted value clears an optional field
fn optional_text(form: &FormFields, key: &str, prior: Option<&Option<String>>) -> Option<Value> {
    match form.get(key) {
        Some(v) if v.trim().is_empty() => None,
        Some(v) => Some(Value::String(v.to_string())),
        None => prior.and_then(|p| p.clone()).map(Value::String),
    }
}

/// Choice fields are only taken from the form when non-empty
fn choice<T: Serialize>(form: &FormFields, key: &str, prior: Option<&T>) -> AppResult<Option<Value>> {
    match form.non_empty(key) {
        Some(v) => Ok(Some(Value::String(v.trim().to_string()))),
        None => json_opt(prior),
    }
}

/// Numeric text parsed as an integer; unparsable input is passed through for the
/// validator to reject with a field-level message.
fn integer(raw: &str) -> Value {
    raw.trim()
        .parse::<u64>()
        .map(Value::from)
        .unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Like [`integer`] but for fractional values such as a slide duration
fn number(raw: &str) -> Value {
    raw.trim()
        .parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(raw.to_string()))
}

fn files_for<'f>(files: &'f [UploadedFile], role: &str) -> Vec<&'f UploadedFile> {
    files.iter().filter(|f| f.field_name == role).collect()
}

/// CTA assembled per field from `text_3` and `ctaButtonUrl`, falling back to the prior button.
/// Without a prior button, a CTA missing either half is left out.
fn cta_button(form: &FormFields, prior: Option<&CtaButton>) -> Option<Value> {
    let text = form
        .non_empty("text_3")
        .map(str::to_string)
        .or_else(|| prior.map(|b| b.text.clone()));
    let url = form
        .non_empty("ctaButtonUrl")
        .map(str::to_string)
        .or_else(|| prior.map(|b| b.url.clone()));

    let (Some(text), Some(url)) = (text, url) else {
        return None;
    };

    let mut button = Candidate::default();
    button
        .set("text", Some(Value::String(text)))
        .set("url", Some(Value::String(url)));
    Some(button.into_value())
}

/// Parse a JSON side-channel field that must hold an array of objects
fn side_channel_list(
    form: &FormFields,
    key: &str,
    section_type: SectionType,
) -> AppResult<Option<Vec<Map<String, Value>>>> {
    let Some(raw) = form.non_empty(key) else {
        return Ok(None);
    };

    let invalid = |field: String, message: String| AppError::ContentValidation {
        context: section_type.as_str().to_string(),
        violations: vec![FieldViolation::new(field, message)],
    };

    let parsed: Value = serde_json::from_str(raw)
        .map_err(|e| invalid(key.to_string(), format!("is not valid JSON: {}", e)))?;

    let Value::Array(items) = parsed else {
        return Err(invalid(key.to_string(), "must be a JSON array".to_string()));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => Ok(map),
            _ => Err(invalid(
                format!("{}[{}]", key, index),
                "must be an object".to_string(),
            )),
        })
        .collect::<AppResult<Vec<_>>>()
        .map(Some)
}

fn image_text(
    files: &[UploadedFile],
    form: &FormFields,
    prior: Option<&ImageTextContent>,
) -> AppResult<Value> {
    let file = files_for(files, ROLE_IMAGE).into_iter().next();

    let image_url = match (file, prior) {
        (Some(file), _) => file.url(),
        (None, Some(prior)) => prior.image_url.clone(),
        (None, None) => {
            return Err(AppError::MissingRequiredFile {
                section_type: SectionType::ImageText,
                role: ROLE_IMAGE,
            })
        }
    };

    let image_alt = form
        .non_empty("imageAlt")
        .map(str::to_string)
        .or_else(|| file.map(|f| f.original_name.clone()))
        .or_else(|| prior.and_then(|p| p.image_alt.clone()));

    let mut candidate = Candidate::default();
    candidate
        .set("imageUrl", Some(Value::String(image_url)))
        .set("imageAlt", image_alt.map(Value::String))
        .set("title", text(form, "text_1", prior.map(|p| &p.title)))
        .set("text", text(form, "text_2", prior.map(|p| &p.text)))
        .set(
            "imagePosition",
            choice(form, "imagePosition", prior.map(|p| &p.image_position))?,
        )
        .set(
            "ctaButton",
            cta_button(form, prior.and_then(|p| p.cta_button.as_ref())),
        );
    Ok(candidate.into_value())
}

fn hero(files: &[UploadedFile], form: &FormFields, prior: Option<&HeroContent>) -> AppResult<Value> {
    let file = files_for(files, ROLE_BACKGROUND_IMAGE).into_iter().next();

    let background_image = match (file, prior) {
        (Some(file), _) => file.url(),
        (None, Some(prior)) => prior.background_image.clone(),
        (None, None) => {
            return Err(AppError::MissingRequiredFile {
                section_type: SectionType::Hero,
                role: ROLE_BACKGROUND_IMAGE,
            })
        }
    };

    let background_image_alt = form
        .non_empty("backgroundImageAlt")
        .map(str::to_string)
        .or_else(|| file.map(|f| f.original_name.clone()))
        .or_else(|| prior.map(|p| p.background_image_alt.clone()));

    let mut candidate = Candidate::default();
    candidate
        .set("backgroundImage", Some(Value::String(background_image)))
        .set("backgroundImageAlt", background_image_alt.map(Value::String))
        .set("title", text(form, "text_1", prior.map(|p| &p.title)))
        .set("subtitle", text(form, "text_2", prior.map(|p| &p.subtitle)))
        .set(
            "textAlignment",
            choice(form, "textAlignment", prior.map(|p| &p.text_alignment))?,
        )
        .set("ctaButton", cta_button(form, prior.map(|p| &p.cta_button)));
    Ok(candidate.into_value())
}

fn gallery(
    files: &[UploadedFile],
    form: &FormFields,
    prior: Option<&GalleryContent>,
) -> AppResult<Value> {
    let uploads = files_for(files, ROLE_IMAGES);

    // New uploads replace the whole image list
    let images = if !uploads.is_empty() {
        let images: Vec<Value> = uploads
            .iter()
            .map(|file| {
                let mut image = Candidate::default();
                image
                    .set("url", Some(Value::String(file.url())))
                    .set("alt", Some(Value::String(file.original_name.clone())));
                image.into_value()
            })
            .collect();
        Value::Array(images)
    } else if let Some(prior) = prior {
        json(&prior.images)?
    } else {
        return Err(AppError::MissingRequiredFile {
            section_type: SectionType::Gallery,
            role: ROLE_IMAGES,
        });
    };

    let layout = choice(form, "layout", prior.map(|p| &p.layout))?
        .unwrap_or_else(|| Value::String(DEFAULT_GALLERY_LAYOUT.to_string()));

    let columns = form
        .non_empty("columns")
        .map(integer)
        .or_else(|| prior.map(|p| Value::from(p.columns)))
        .unwrap_or_else(|| Value::from(DEFAULT_GALLERY_COLUMNS));

    let mut candidate = Candidate::default();
    candidate
        .set("title", optional_text(form, "text_1", prior.map(|p| &p.title)))
        .set("images", Some(images))
        .set("layout", Some(layout))
        .set("columns", Some(columns));
    Ok(candidate.into_value())
}

fn slider(files: &[UploadedFile], form: &FormFields, prior: Option<&SliderContent>) -> AppResult<Value> {
    let uploads = files_for(files, ROLE_IMAGES);

    // New uploads replace all slides; `slideData` is matched to them by position
    let slides = if !uploads.is_empty() {
        let slide_data = side_channel_list(form, "slideData", SectionType::Slider)?.unwrap_or_default();

        let slides: Vec<Value> = uploads
            .iter()
            .enumerate()
            .map(|(index, file)| {
                let data = slide_data.get(index);
                let field = |key: &str| data.and_then(|d| d.get(key)).filter(|v| !v.is_null()).cloned();

                let mut slide = Candidate::default();
                slide
                    .set("imageUrl", Some(Value::String(file.url())))
                    .set(
                        "imageAlt",
                        field("imageAlt").or_else(|| Some(Value::String(file.original_name.clone()))),
                    )
                    .set("title", field("title"))
                    .set("description", field("description"))
                    .set("ctaButton", field("ctaButton"));
                slide.into_value()
            })
            .collect();
        Value::Array(slides)
    } else if let Some(prior) = prior {
        json(&prior.slides)?
    } else {
        return Err(AppError::MissingRequiredFile {
            section_type: SectionType::Slider,
            role: ROLE_IMAGES,
        });
    };

    let auto_play = match form.get("autoPlay") {
        Some(v) => Some(Value::Bool(v.trim() == "true")),
        None => prior.and_then(|p| p.auto_play).map(Value::Bool),
    };

    let duration = form
        .non_empty("duration")
        .map(number)
        .or_else(|| prior.and_then(|p| p.duration).map(Value::from));

    let mut candidate = Candidate::default();
    candidate
        .set("autoPlay", auto_play)
        .set("duration", duration)
        .set("slides", Some(slides));
    Ok(candidate.into_value())
}

fn text_block(form: &FormFields, prior: Option<&TextBlockContent>) -> AppResult<Value> {
    let mut candidate = Candidate::default();
    candidate
        .set("title", optional_text(form, "text_1", prior.map(|p| &p.title)))
        .set("content", text(form, "text_2", prior.map(|p| &p.content)))
        .set(
            "textAlignment",
            choice(form, "textAlignment", prior.map(|p| &p.text_alignment))?,
        )
        .set(
            "backgroundColor",
            optional_text(form, "backgroundColor", prior.map(|p| &p.background_color)),
        );
    Ok(candidate.into_value())
}

fn contact_form(form: &FormFields, prior: Option<&ContactFormContent>) -> AppResult<Value> {
    let fields = match side_channel_list(form, "formFields", SectionType::ContactForm)? {
        Some(fields) => Some(Value::Array(fields.into_iter().map(Value::Object).collect())),
        None => json_opt(prior.map(|p| &p.fields))?,
    };

    let mut candidate = Candidate::default();
    candidate
        .set("title", text(form, "text_1", prior.map(|p| &p.title)))
        .set(
            "description",
            optional_text(form, "text_2", prior.map(|p| &p.description)),
        )
        .set("fields", fields)
        .set(
            "submitButtonText",
            text(form, "text_3", prior.map(|p| &p.submit_button_text)),
        )
        .set(
            "successMessage",
            text(form, "text_4", prior.map(|p| &p.success_message)),
        );
    Ok(candidate.into_value())
}
