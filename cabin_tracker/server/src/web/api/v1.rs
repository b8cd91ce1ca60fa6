use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::cabin::CabinServiceError;
use crate::task::TaskServiceError;
use crate::validation::{FieldError, ValidationErrors, parse_hyphenated_uuid};

/// JSON response for API errors
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine readable error code
    pub error: String,
    /// Human readable description
    pub message: String,
    /// Per-field validation failures
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<FieldError>,
}

impl ErrorResponse {
    pub fn new(error: &str, message: String) -> Self {
        Self {
            error: error.to_string(),
            message,
            details: Vec::new(),
        }
    }
}

/// Errors surfaced by the JSON API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The requested resource does not exist.
    #[error("{0}")]
    NotFound(String),
    /// A path identifier is not a UUID.
    #[error("\"{0}\" is not a valid UUID")]
    InvalidId(String),
    /// The request is well formed but refers to something that cannot be used.
    #[error("{0}")]
    InvalidArgument(String),
    /// One or more fields failed validation.
    #[error("Request validation failed")]
    Validation(#[from] ValidationErrors),
    /// The body is not JSON of the expected shape.
    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),
    /// The store failed.
    #[error("Database error: {0}")]
    Database(#[source] sea_orm::DbErr),
}

impl From<CabinServiceError> for ApiError {
    fn from(err: CabinServiceError) -> Self {
        match err {
            CabinServiceError::CabinNotFound(_) => ApiError::NotFound(err.to_string()),
            CabinServiceError::Database(db_err) => ApiError::Database(db_err),
        }
    }
}

impl From<TaskServiceError> for ApiError {
    fn from(err: TaskServiceError) -> Self {
        match err {
            TaskServiceError::TaskNotFound(_) | TaskServiceError::CabinNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            TaskServiceError::CabinDoesNotExist(_) => ApiError::InvalidArgument(err.to_string()),
            TaskServiceError::Database(db_err) => ApiError::Database(db_err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status_code, body) = match self {
            ApiError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new("NOT_FOUND", message),
            ),
            ApiError::InvalidId(_) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("INVALID_ID", message),
            ),
            ApiError::InvalidArgument(_) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("INVALID_ARGUMENT", message),
            ),
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    details: errors.into_field_errors(),
                    ..ErrorResponse::new("VALIDATION_FAILED", message)
                },
            ),
            ApiError::InvalidBody(rejection) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("INVALID_BODY", rejection.body_text()),
            ),
            ApiError::Database(err) => {
                tracing::error!("Database error while handling API request: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        "INTERNAL_ERROR",
                        "An unexpected error occurred while processing your request. Please try again later."
                            .to_string(),
                    ),
                )
            }
        };

        (status_code, Json(body)).into_response()
    }
}

/// Parses a path identifier, rejecting anything that is not a UUID.
pub fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    parse_hyphenated_uuid(raw).ok_or_else(|| {
        tracing::info!("Rejected malformed identifier {:?}", raw);
        ApiError::InvalidId(raw.to_string())
    })
}
