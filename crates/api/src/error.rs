//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures unexpected errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`; the response body is always `{"message": ...}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::ServiceError;
use crate::services::auth::AuthError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Cart/checkout/catalog operation failed.
    #[error("service error: {0}")]
    Service(#[from] ServiceError),

    /// Authentication operation failed.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// Request is not authenticated.
    #[error("unauthorized")]
    Unauthorized,

    /// Bad request from client.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Service(err) => match err {
                ServiceError::UserNotFound
                | ServiceError::ProductNotFound(_)
                | ServiceError::LineNotFound(_) => StatusCode::NOT_FOUND,
                ServiceError::InvalidQuantity(_) | ServiceError::EmptyCart => {
                    StatusCode::BAD_REQUEST
                }
                ServiceError::OutOfStock(_) => StatusCode::CONFLICT,
                ServiceError::Unavailable
                | ServiceError::Repository(RepositoryError::Timeout) => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                ServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::InvalidToken => {
                    StatusCode::UNAUTHORIZED
                }
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::WeakPassword(_) | AuthError::InvalidEmail(_) => {
                    StatusCode::BAD_REQUEST
                }
                AuthError::Repository(RepositoryError::Timeout) => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                AuthError::Hashing(_) | AuthError::Repository(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// User-facing message. Internal detail never leaks to clients.
    fn message(&self) -> String {
        match self {
            Self::Service(err) => match err {
                ServiceError::Repository(repo) if !matches!(repo, RepositoryError::Timeout) => {
                    "Internal server error".to_owned()
                }
                other => other.to_string(),
            },
            Self::Auth(err) => match err {
                AuthError::Hashing(_) => "Internal server error".to_owned(),
                AuthError::Repository(RepositoryError::Timeout) => {
                    "store unavailable, try again".to_owned()
                }
                AuthError::Repository(_) => "Internal server error".to_owned(),
                other => other.to_string(),
            },
            Self::Unauthorized => "Unauthorized".to_owned(),
            Self::Internal(_) => "Internal server error".to_owned(),
            Self::BadRequest(msg) | Self::NotFound(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() && status != StatusCode::SERVICE_UNAVAILABLE {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (status, Json(json!({ "message": self.message() }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
