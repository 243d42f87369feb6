use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use std::fmt;

use crate::models::SectionType;

/// One failed field inside a content payload, e.g. `slides[1].imageUrl`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

#[derive(Debug)]
pub enum AppError {
    DatabaseError(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
    Validation(String),
    ContentValidation {
        context: String,
        violations: Vec<FieldViolation>,
    },
    MissingRequiredFile {
        section_type: SectionType,
        role: &'static str,
    },
    StorageError(String),
    SerializationError(String),
    ConfigurationError(String),
}

impl AppError {
    /// Field paths named by a content validation failure, empty for every other kind
    pub fn violated_fields(&self) -> Vec<&str> {
        match self {
            AppError::ContentValidation { violations, .. } => {
                violations.iter().map(|v| v.field.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::ContentValidation { context, violations } => {
                let listed: Vec<String> = violations.iter().map(|v| v.to_string()).collect();
                write!(f, "Invalid {} content: {}", context, listed.join(", "))
            }
            AppError::MissingRequiredFile { section_type, role } => write!(
                f,
                "Missing required file: '{}' upload is required for {} section",
                role, section_type
            ),
            AppError::StorageError(msg) => write!(f, "Storage error: {}", msg),
            AppError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            AppError::ConfigurationError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::ContentValidation { .. } => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::MissingRequiredFile { .. } => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::StorageError(msg) => {
                tracing::error!("Storage error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::SerializationError(msg) | AppError::ConfigurationError(msg) => {
                tracing::error!("{}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
        };

        let body = match &self {
            AppError::ContentValidation { violations, .. } => Json(json!({
                "error": error_message,
                "status": status.as_u16(),
                "fields": violations,
            })),
            _ => Json(json!({
                "error": error_message,
                "status": status.as_u16()
            })),
        };

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".to_string()),
            other => AppError::DatabaseError(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SerializationError(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
