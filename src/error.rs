use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::constants::{
    MSG_ALREADY_PURCHASED, MSG_FORBIDDEN, MSG_INVALID_CREDENTIALS, MSG_UNAUTHENTICATED,
    MSG_VALIDATION_FAILED, MSG_VIDEO_NOT_FOUND,
};

/// Per-field validation error map, rendered as `{"field": ["message", ...]}`
#[derive(Debug, Default, Clone, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<&'static str, Vec<String>>);

impl ValidationErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Ok if no errors were collected, otherwise the 422 error
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }

    /// Shorthand for a single-field failure
    pub fn single(field: &'static str, message: impl Into<String>) -> AppError {
        let mut errors = Self::default();
        errors.add(field, message);
        AppError::Validation(errors)
    }
}

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("The given data was invalid.")]
    Validation(ValidationErrors),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthenticated")]
    Unauthenticated,

    #[error("Forbidden")]
    Forbidden,

    #[error("Video already purchased")]
    AlreadyPurchased,

    #[error("Video not found")]
    VideoNotFound,
}

/// Implement IntoResponse to convert AppError into HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            // Validation failures carry a structured body; everything else
            // is a plain message.
            AppError::Validation(errors) => {
                let body = Json(json!({
                    "message": MSG_VALIDATION_FAILED,
                    "errors": errors,
                }));
                return (StatusCode::UNPROCESSABLE_ENTITY, body).into_response();
            }
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::Transaction(ref e) => {
                tracing::error!("Transaction error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::Table(ref e) => {
                tracing::error!("Table error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::Storage(ref e) => {
                tracing::error!("Storage error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::Commit(ref e) => {
                tracing::error!("Commit error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::Serialization(ref e) => {
                tracing::error!("Serialization error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::TaskJoin(ref e) => {
                tracing::error!("Task join error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::Io(ref e) => {
                tracing::error!("I/O error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, MSG_INVALID_CREDENTIALS),
            AppError::Unauthenticated => (StatusCode::UNAUTHORIZED, MSG_UNAUTHENTICATED),
            AppError::Forbidden => (StatusCode::FORBIDDEN, MSG_FORBIDDEN),
            AppError::AlreadyPurchased => (StatusCode::CONFLICT, MSG_ALREADY_PURCHASED),
            AppError::VideoNotFound => (StatusCode::NOT_FOUND, MSG_VIDEO_NOT_FOUND),
        };

        let body = Json(json!({
            "message": message
        }));

        (status, body).into_response()
    }
}

/// Result type alias for application results
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_collects_per_field() {
        let mut errors = ValidationErrors::default();
        assert!(errors.is_empty());

        errors.add("email", "The email field is required.");
        errors.add("email", "The email must be a valid email address.");
        errors.add("password", "The password must be at least 8 characters.");

        let value = serde_json::to_value(&errors).unwrap();
        assert_eq!(value["email"].as_array().unwrap().len(), 2);
        assert_eq!(value["password"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_into_result_empty_is_ok() {
        assert!(ValidationErrors::default().into_result().is_ok());
    }

    #[test]
    fn test_into_result_nonempty_is_err() {
        let mut errors = ValidationErrors::default();
        errors.add("title", "The title field is required.");
        assert!(matches!(
            errors.into_result(),
            Err(AppError::Validation(_))
        ));
    }
}
