// Multipart reading - collects named text parts and file parts, nothing else

use axum::extract::Multipart;

use crate::content::FormFields;
use crate::error::{AppError, AppResult};
use crate::infrastructure::uploads::IncomingFile;
use crate::services::SectionForm;

fn malformed(err: impl std::fmt::Display) -> AppError {
    AppError::Validation(format!("Malformed multipart body: {}", err))
}

/// Parts with a file name become files; all other named parts are text fields.
/// Unnamed parts are ignored.
pub async fn read_form(mut multipart: Multipart) -> AppResult<SectionForm> {
    let mut fields = FormFields::new();
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match field.file_name().map(str::to_string) {
            Some(original_name) => {
                let data = field.bytes().await.map_err(malformed)?;
                files.push(IncomingFile {
                    field_name: name,
                    original_name,
                    data: data.to_vec(),
                });
            }
            None => {
                let value = field.text().await.map_err(malformed)?;
                fields.insert(name, value);
            }
        }
    }

    Ok(SectionForm { fields, files })
}
