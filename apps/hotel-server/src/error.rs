//! Server error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use entities::ValidationErrors;
use hotel_store::StoreError;
use serde_json::json;

use crate::services::price_client::PriceLookupError;

/// Body message for missing entities.
pub const ENTITY_NOT_FOUND_MESSAGE: &str = "Entity not found";

/// Body message for failed logins.
pub const AUTH_FAILED_MESSAGE: &str = "Auth failed";

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Field-level validation failures. The field map is the response body.
    #[error(transparent)]
    Validation(ValidationErrors),

    /// Invalid request parameters.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Resource not found, or not visible to the caller.
    #[error("Entity not found")]
    NotFound,

    /// Authentication required.
    #[error("Authentication required")]
    AuthenticationRequired,

    /// The bearer token was rejected.
    #[error("Invalid token")]
    InvalidToken,

    /// Login with wrong email or password.
    #[error("Auth failed")]
    AuthFailed,

    /// Permission denied.
    #[error("Permission denied")]
    PermissionDenied,

    /// The price service could not be reached or answered with an error.
    #[error("Price lookup failed: {0}")]
    PriceLookup(#[from] PriceLookupError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(StoreError),

    /// Authentication error.
    #[error("Auth error: {0}")]
    Auth(#[from] auth::AuthError),
}

impl From<ValidationErrors> for ServerError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<StoreError> for ServerError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound { .. } => Self::NotFound,
            other => Self::Database(other),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ServerError::Validation(errors) => {
                return (StatusCode::BAD_REQUEST, Json(errors)).into_response();
            }
            ServerError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ServerError::NotFound => (StatusCode::NOT_FOUND, ENTITY_NOT_FOUND_MESSAGE.to_string()),
            ServerError::AuthenticationRequired => (
                StatusCode::UNAUTHORIZED,
                "Authentication required".to_string(),
            ),
            ServerError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token".to_string()),
            ServerError::AuthFailed => (StatusCode::UNAUTHORIZED, AUTH_FAILED_MESSAGE.to_string()),
            ServerError::PermissionDenied => {
                (StatusCode::FORBIDDEN, "Permission denied".to_string())
            }
            ServerError::PriceLookup(e) => {
                tracing::warn!(error = %e, "Price lookup failed");
                (StatusCode::BAD_GATEWAY, "Price service unavailable".to_string())
            }
            ServerError::Database(e) => {
                tracing::error!(error = %e, "Store operation failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            ServerError::Auth(e) => {
                tracing::error!(error = %e, "Authentication backend failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
