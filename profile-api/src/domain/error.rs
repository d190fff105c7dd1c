use serde::Serialize;
use thiserror::Error;

/// A single failed constraint on a user attribute.
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

/// Errors raised by the avatar file-intake pipeline and its storage.
#[derive(Debug, Error)]
pub enum AvatarError {
    #[error("unsupported media type")]
    UnsupportedMediaType,
    #[error("avatar payload exceeds limit")]
    PayloadTooLarge,
    #[error("invalid image payload")]
    InvalidImage,
    #[error("avatar storage failed: {0}")]
    Storage(String),
}

/// Errors that can occur during user operations.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("user not found")]
    NotFound,
    #[error("validation failed")]
    Validation(Vec<FieldViolation>),
    #[error(transparent)]
    Avatar(#[from] AvatarError),
    #[error("user storage failed: {0}")]
    Storage(String),
}

impl UserError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldViolation::new(field, message)])
    }
}
