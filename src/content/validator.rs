// Content Validator - the single gate between untyped section payloads and SectionContent
// Every violation is collected before failing, so callers see the full list of bad fields.

use serde_json::{Map, Value};

use super::types::SectionContent;
use crate::error::{AppError, AppResult, FieldViolation};
use crate::models::SectionType;

const IMAGE_POSITIONS: &[&str] = &["left", "right"];
const TEXT_ALIGNMENTS: &[&str] = &["left", "center", "right"];
const GALLERY_LAYOUTS: &[&str] = &["grid", "masonry", "carousel"];
const FORM_FIELD_TYPES: &[&str] = &["text", "email", "tel", "textarea", "select"];

/// Validate `raw` against the schema of `section_type`.
///
/// On success the returned content always carries `section_type` as its tag,
/// whatever `type` the payload claimed. Unknown extra fields are dropped.
pub fn validate(section_type: SectionType, raw: &Value) -> AppResult<SectionContent> {
    let mut report = Report::default();

    let Some(obj) = raw.as_object() else {
        report.push("content", "must be an object");
        return Err(report.into_error(section_type));
    };

    match section_type {
        SectionType::ImageText => check_image_text(obj, &mut report),
        SectionType::Slider => check_slider(obj, &mut report),
        SectionType::Hero => check_hero(obj, &mut report),
        SectionType::TextBlock => check_text_block(obj, &mut report),
        SectionType::Gallery => check_gallery(obj, &mut report),
        SectionType::ContactForm => check_contact_form(obj, &mut report),
    }

    if !report.is_empty() {
        return Err(report.into_error(section_type));
    }

    let mut tagged = obj.clone();
    tagged.insert(
        "type".to_string(),
        Value::String(section_type.as_str().to_string()),
    );

    serde_json::from_value(Value::Object(tagged)).map_err(|e| {
        let mut report = Report::default();
        report.push("content", &e.to_string());
        report.into_error(section_type)
    })
}

#[derive(Debug, Default)]
struct Report {
    violations: Vec<FieldViolation>,
}

impl Report {
    fn push(&mut self, field: impl Into<String>, message: &str) {
        self.violations.push(FieldViolation::new(field, message));
    }

    fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    fn into_error(self, section_type: SectionType) -> AppError {
        AppError::ContentValidation {
            context: section_type.as_str().to_string(),
            violations: self.violations,
        }
    }
}

fn field_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

fn is_absent(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

fn required_string(obj: &Map<String, Value>, prefix: &str, key: &str, report: &mut Report) {
    match obj.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => {}
        _ => report.push(field_path(prefix, key), "is required and must be a non-empty string"),
    }
}

fn optional_string(obj: &Map<String, Value>, prefix: &str, key: &str, report: &mut Report) {
    let value = obj.get(key);
    if !is_absent(value) && !matches!(value, Some(Value::String(_))) {
        report.push(field_path(prefix, key), "must be a string");
    }
}

fn required_choice(
    obj: &Map<String, Value>,
    prefix: &str,
    key: &str,
    allowed: &[&str],
    report: &mut Report,
) {
    match obj.get(key) {
        Some(Value::String(s)) if allowed.contains(&s.as_str()) => {}
        _ => report.push(
            field_path(prefix, key),
            &format!("is required and must be one of: {}", allowed.join(", ")),
        ),
    }
}

fn required_bool(obj: &Map<String, Value>, prefix: &str, key: &str, report: &mut Report) {
    if !matches!(obj.get(key), Some(Value::Bool(_))) {
        report.push(field_path(prefix, key), "is required and must be a boolean");
    }
}

fn optional_bool(obj: &Map<String, Value>, prefix: &str, key: &str, report: &mut Report) {
    let value = obj.get(key);
    if !is_absent(value) && !matches!(value, Some(Value::Bool(_))) {
        report.push(field_path(prefix, key), "must be a boolean");
    }
}

fn is_positive_integer(value: &Value) -> bool {
    value
        .as_u64()
        .is_some_and(|n| n > 0 && n <= u64::from(u32::MAX))
}

fn required_positive_integer(obj: &Map<String, Value>, prefix: &str, key: &str, report: &mut Report) {
    if !obj.get(key).is_some_and(is_positive_integer) {
        report.push(field_path(prefix, key), "is required and must be a positive integer");
    }
}

fn is_positive_number(value: &Value) -> bool {
    value.as_f64().is_some_and(|n| n.is_finite() && n > 0.0)
}

fn optional_positive_number(obj: &Map<String, Value>, prefix: &str, key: &str, report: &mut Report) {
    let value = obj.get(key);
    if !is_absent(value) && !value.is_some_and(is_positive_number) {
        report.push(field_path(prefix, key), "must be a positive number");
    }
}

fn optional_string_list(obj: &Map<String, Value>, prefix: &str, key: &str, report: &mut Report) {
    match obj.get(key) {
        None | Some(Value::Null) => {}
        Some(Value::Array(items)) if items.iter().all(Value::is_string) => {}
        Some(_) => report.push(field_path(prefix, key), "must be an array of strings"),
    }
}

fn non_empty_list<'v>(
    obj: &'v Map<String, Value>,
    key: &str,
    report: &mut Report,
) -> Option<&'v Vec<Value>> {
    match obj.get(key) {
        Some(Value::Array(items)) if !items.is_empty() => Some(items),
        _ => {
            report.push(key, "is required and must be a non-empty array");
            None
        }
    }
}

/// Each list element must be an object; returns it with its indexed path
fn list_item<'v>(
    item: &'v Value,
    key: &str,
    index: usize,
    report: &mut Report,
) -> Option<(&'v Map<String, Value>, String)> {
    let path = format!("{}[{}]", key, index);
    match item.as_object() {
        Some(obj) => Some((obj, path)),
        None => {
            report.push(path, "must be an object");
            None
        }
    }
}

fn cta_button(obj: &Map<String, Value>, prefix: &str, required: bool, report: &mut Report) {
    let path = field_path(prefix, "ctaButton");
    match obj.get("ctaButton") {
        value if is_absent(value) => {
            if required {
                report.push(path, "is required and must be an object with text and url");
            }
        }
        Some(Value::Object(button)) => {
            required_string(button, &path, "text", report);
            required_string(button, &path, "url", report);
        }
        Some(_) => report.push(path, "must be an object with text and url"),
        None => {}
    }
}

fn check_image_text(obj: &Map<String, Value>, report: &mut Report) {
    required_string(obj, "", "imageUrl", report);
    optional_string(obj, "", "imageAlt", report);
    required_string(obj, "", "title", report);
    required_string(obj, "", "text", report);
    required_choice(obj, "", "imagePosition", IMAGE_POSITIONS, report);
    cta_button(obj, "", false, report);
}

fn check_slider(obj: &Map<String, Value>, report: &mut Report) {
    optional_bool(obj, "", "autoPlay", report);
    optional_positive_number(obj, "", "duration", report);

    if let Some(slides) = non_empty_list(obj, "slides", report) {
        for (index, item) in slides.iter().enumerate() {
            let Some((slide, path)) = list_item(item, "slides", index, report) else {
                continue;
            };
            required_string(slide, &path, "imageUrl", report);
            optional_string(slide, &path, "imageAlt", report);
            optional_string(slide, &path, "title", report);
            optional_string(slide, &path, "description", report);
            cta_button(slide, &path, false, report);
        }
    }
}

fn check_hero(obj: &Map<String, Value>, report: &mut Report) {
    required_string(obj, "", "backgroundImage", report);
    required_string(obj, "", "backgroundImageAlt", report);
    required_string(obj, "", "title", report);
    required_string(obj, "", "subtitle", report);
    cta_button(obj, "", true, report);
    required_choice(obj, "", "textAlignment", TEXT_ALIGNMENTS, report);
}

fn check_text_block(obj: &Map<String, Value>, report: &mut Report) {
    optional_string(obj, "", "title", report);
    required_string(obj, "", "content", report);
    required_choice(obj, "", "textAlignment", TEXT_ALIGNMENTS, report);
    optional_string(obj, "", "backgroundColor", report);
}

fn check_gallery(obj: &Map<String, Value>, report: &mut Report) {
    optional_string(obj, "", "title", report);

    if let Some(images) = non_empty_list(obj, "images", report) {
        for (index, item) in images.iter().enumerate() {
            let Some((image, path)) = list_item(item, "images", index, report) else {
                continue;
            };
            required_string(image, &path, "url", report);
            required_string(image, &path, "alt", report);
            optional_string(image, &path, "caption", report);
        }
    }

    required_choice(obj, "", "layout", GALLERY_LAYOUTS, report);
    required_positive_integer(obj, "", "columns", report);
}

fn check_contact_form(obj: &Map<String, Value>, report: &mut Report) {
    required_string(obj, "", "title", report);
    optional_string(obj, "", "description", report);

    if let Some(fields) = non_empty_list(obj, "fields", report) {
        for (index, item) in fields.iter().enumerate() {
            let Some((field, path)) = list_item(item, "fields", index, report) else {
                continue;
            };
            required_string(field, &path, "name", report);
            required_string(field, &path, "label", report);
            required_choice(field, &path, "type", FORM_FIELD_TYPES, report);
            required_bool(field, &path, "required", report);
            optional_string(field, &path, "placeholder", report);
            optional_string_list(field, &path, "options", report);
        }
    }

    required_string(obj, "", "submitButtonText", report);
    required_string(obj, "", "successMessage", report);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal_payload(section_type: SectionType) -> Value {
        match section_type {
            SectionType::ImageText => json!({
                "imageUrl": "/uploads/a.jpg",
                "title": "Title",
                "text": "Body",
                "imagePosition": "left"
            }),
            SectionType::Slider => json!({
                "slides": [{ "imageUrl": "/uploads/s1.jpg" }]
            }),
            SectionType::Hero => json!({
                "backgroundImage": "/uploads/bg.jpg",
                "backgroundImageAlt": "Skyline",
                "title": "Welcome",
                "subtitle": "Subtitle",
                "ctaButton": { "text": "Go", "url": "/go" },
                "textAlignment": "center"
            }),
            SectionType::TextBlock => json!({
                "content": "Some text",
                "textAlignment": "left"
            }),
            SectionType::Gallery => json!({
                "images": [{ "url": "/uploads/g1.jpg", "alt": "One" }],
                "layout": "grid",
                "columns": 3
            }),
            SectionType::ContactForm => json!({
                "title": "Contact",
                "fields": [{ "name": "email", "label": "Email", "type": "email", "required": true }],
                "submitButtonText": "Send",
                "successMessage": "Thanks"
            }),
        }
    }

    #[test]
    fn test_minimal_payloads_pass() {
        for section_type in SectionType::ALL {
            let content = validate(section_type, &minimal_payload(section_type))
                .unwrap_or_else(|e| panic!("{} should validate: {}", section_type, e));
            assert_eq!(content.section_type(), section_type);
        }
    }

    #[test]
    fn test_removing_any_required_field_names_it() {
        for section_type in SectionType::ALL {
            let payload = minimal_payload(section_type);
            let keys: Vec<String> = payload.as_object().unwrap().keys().cloned().collect();

            for key in keys {
                let mut broken = payload.clone();
                broken.as_object_mut().unwrap().remove(&key);

                let err = validate(section_type, &broken)
                    .expect_err(&format!("{} without {} must fail", section_type, key));
                assert!(
                    err.violated_fields().contains(&key.as_str()),
                    "{} without {} reported {:?}",
                    section_type,
                    key,
                    err.violated_fields()
                );
            }
        }
    }

    #[test]
    fn test_all_violations_are_reported() {
        let err = validate(
            SectionType::Hero,
            &json!({ "backgroundImage": "/uploads/bg.jpg", "ctaButton": { "text": "Go" }, "textAlignment": "justify" }),
        )
        .unwrap_err();

        let fields = err.violated_fields();
        assert_eq!(
            fields,
            vec!["backgroundImageAlt", "title", "subtitle", "ctaButton.url", "textAlignment"]
        );
    }

    #[test]
    fn test_nested_paths() {
        let err = validate(
            SectionType::Slider,
            &json!({
                "duration": 0,
                "slides": [
                    { "imageUrl": "/uploads/1.jpg" },
                    { "title": 5, "ctaButton": { "url": "/x" } },
                    "not-a-slide"
                ]
            }),
        )
        .unwrap_err();

        assert_eq!(
            err.violated_fields(),
            vec![
                "duration",
                "slides[1].imageUrl",
                "slides[1].title",
                "slides[1].ctaButton.text",
                "slides[2]"
            ]
        );

        let err = validate(
            SectionType::ContactForm,
            &json!({
                "title": "Contact",
                "fields": [{ "name": "topic", "label": "Topic", "type": "radio", "required": "yes", "options": [1] }],
                "submitButtonText": "Send",
                "successMessage": "Thanks"
            }),
        )
        .unwrap_err();
        assert_eq!(
            err.violated_fields(),
            vec!["fields[0].type", "fields[0].required", "fields[0].options"]
        );
    }

    #[test]
    fn test_positivity_and_emptiness() {
        let err = validate(
            SectionType::Gallery,
            &json!({ "images": [], "layout": "grid", "columns": 0 }),
        )
        .unwrap_err();
        assert_eq!(err.violated_fields(), vec!["images", "columns"]);

        let err = validate(
            SectionType::Gallery,
            &json!({ "images": [{ "url": "/u.jpg", "alt": "a" }], "layout": "grid", "columns": 2.5 }),
        )
        .unwrap_err();
        assert_eq!(err.violated_fields(), vec!["columns"]);
    }

    #[test]
    fn test_fractional_slide_duration() {
        let content = validate(
            SectionType::Slider,
            &json!({ "duration": 2.5, "slides": [{ "imageUrl": "/uploads/a.jpg" }] }),
        )
        .unwrap();
        let SectionContent::Slider(slider) = content else {
            panic!("expected slider");
        };
        assert_eq!(slider.duration, Some(2.5));

        for duration in [json!(-0.5), json!("2.5"), json!(0.0)] {
            let err = validate(
                SectionType::Slider,
                &json!({ "duration": duration, "slides": [{ "imageUrl": "/uploads/a.jpg" }] }),
            )
            .unwrap_err();
            assert_eq!(err.violated_fields(), vec!["duration"], "{}", duration);
        }
    }

    #[test]
    fn test_canonical_type_wins() {
        let mut payload = minimal_payload(SectionType::TextBlock);
        payload["type"] = json!("hero");

        let content = validate(SectionType::TextBlock, &payload).unwrap();
        assert_eq!(content.section_type(), SectionType::TextBlock);

        let tagged = serde_json::to_value(&content).unwrap();
        assert_eq!(tagged["type"], json!("text-block"));
    }

    #[test]
    fn test_non_object_content_is_rejected() {
        let err = validate(SectionType::TextBlock, &json!("just text")).unwrap_err();
        assert_eq!(err.violated_fields(), vec!["content"]);
    }

    #[test]
    fn test_optional_nulls_are_accepted() {
        let mut payload = minimal_payload(SectionType::ImageText);
        payload["imageAlt"] = Value::Null;
        payload["ctaButton"] = Value::Null;

        let content = validate(SectionType::ImageText, &payload).unwrap();
        match content {
            SectionContent::ImageText(image_text) => {
                assert!(image_text.image_alt.is_none());
                assert!(image_text.cta_button.is_none());
            }
            other => panic!("unexpected variant {:?}", other),
        }
    }
}
