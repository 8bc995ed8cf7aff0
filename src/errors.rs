// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for the backend, the client and the picker shell

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: One enum shared by every layer of the picker
/// Each variant maps to an HTTP status code when returned from a handler
#[derive(Error, Debug)]
pub enum PlacesError {
    #[error("Place not found with id: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("External API error: {0}")]
    ExternalApiError(String),

    /// Non-success status from the places backend.
    /// Displays only the message so it can be shown to the user as-is.
    #[error("{message}")]
    RemoteStatus { status: u16, message: String },
}

impl From<std::io::Error> for PlacesError {
    fn from(err: std::io::Error) -> Self {
        PlacesError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for PlacesError {
    fn from(err: serde_json::Error) -> Self {
        PlacesError::StorageError(format!("Invalid JSON: {}", err))
    }
}

/// Convert PlacesError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and JSON responses
impl ResponseError for PlacesError {
    fn error_response(&self) -> HttpResponse {
        let error_code = match self {
            PlacesError::NotFound(_) => "NOT_FOUND",
            PlacesError::ValidationError(_) => "VALIDATION_ERROR",
            PlacesError::StorageError(_) => "STORAGE_ERROR",
            PlacesError::ExternalApiError(_) => "EXTERNAL_API_ERROR",
            PlacesError::RemoteStatus { .. } => "REMOTE_STATUS",
        };

        let body = json!({
            "error": {
                "code": error_code,
                "message": self.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        });

        HttpResponse::build(self.status_code()).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            PlacesError::NotFound(_) => StatusCode::NOT_FOUND,
            PlacesError::ValidationError(_) => StatusCode::BAD_REQUEST,
            PlacesError::StorageError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PlacesError::ExternalApiError(_) => StatusCode::BAD_GATEWAY,
            PlacesError::RemoteStatus { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_status_displays_bare_message() {
        let err = PlacesError::RemoteStatus {
            status: 500,
            message: "Failed to fetch places".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to fetch places");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            PlacesError::ValidationError("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            PlacesError::NotFound("p1".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            PlacesError::StorageError("disk".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
