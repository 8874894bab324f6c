//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use playguard_domain::error::{PlayGuardError, ValidationError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Errors returned by API handlers.
#[derive(Debug)]
pub enum ApiError {
    /// An error from the application layer.
    Domain(PlayGuardError),
    /// The request itself could not be understood.
    BadRequest(String),
}

impl ApiError {
    /// Error for a path segment that is not a valid identifier.
    pub(crate) fn invalid_id(id: &str) -> Self {
        Self::Domain(ValidationError::InvalidId(id.to_string()).into())
    }
}

impl From<PlayGuardError> for ApiError {
    fn from(err: PlayGuardError) -> Self {
        Self::Domain(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            Self::Domain(PlayGuardError::Validation(err)) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            Self::Domain(PlayGuardError::NotFound(err)) => (StatusCode::NOT_FOUND, err.to_string()),
            Self::Domain(PlayGuardError::Storage(err)) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
