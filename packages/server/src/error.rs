use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use storage::StorageError;

use crate::utils::jwt::TokenError;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `TOKEN_MISSING`,
    /// `TOKEN_INVALID`, `INVALID_CREDENTIALS`, `UNAUTHORIZED`, `NOT_FOUND`,
    /// `CONFLICT`, `USERNAME_TAKEN`, `ALREADY_MAIN`, `CANNOT_DELETE_MAIN`,
    /// `UPLOAD_FAILED`, `PERSISTENCE_ERROR`, `CONFIGURATION_ERROR`,
    /// `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Password must be 4-8 characters")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    TokenMissing,
    TokenInvalid,
    InvalidCredentials,
    /// The caller is not the identity the operation acts on.
    Unauthorized,
    NotFound(String),
    Conflict(String),
    UsernameTaken,
    AlreadyMain,
    CannotDeleteMain,
    /// The photo store failed or did not confirm the operation.
    UploadFailed(String),
    Persistence(String),
    Configuration(String),
    Internal(String),
}

impl AppError {
    /// Stable code sent to clients for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::TokenMissing => "TOKEN_MISSING",
            AppError::TokenInvalid => "TOKEN_INVALID",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::UsernameTaken => "USERNAME_TAKEN",
            AppError::AlreadyMain => "ALREADY_MAIN",
            AppError::CannotDeleteMain => "CANNOT_DELETE_MAIN",
            AppError::UploadFailed(_) => "UPLOAD_FAILED",
            AppError::Persistence(_) => "PERSISTENCE_ERROR",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        let code = self.code();
        let (status, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::TokenMissing => (StatusCode::UNAUTHORIZED, "Authentication required".into()),
            AppError::TokenInvalid => (StatusCode::UNAUTHORIZED, "Invalid or expired token".into()),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Invalid username or password".into(),
            ),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "You can only act on your own account".into(),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::UsernameTaken => (StatusCode::CONFLICT, "Username already exists".into()),
            AppError::AlreadyMain => (
                StatusCode::BAD_REQUEST,
                "This is already the main photo".into(),
            ),
            AppError::CannotDeleteMain => (
                StatusCode::BAD_REQUEST,
                "You cannot delete your main photo".into(),
            ),
            AppError::UploadFailed(detail) => {
                tracing::warn!("Photo store failure: {}", detail);
                (StatusCode::BAD_GATEWAY, detail)
            }
            AppError::Persistence(detail) => {
                tracing::error!("Persistence error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to save changes".into(),
                )
            }
            AppError::Configuration(detail) => {
                tracing::error!("Configuration error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server is misconfigured".into(),
                )
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".into(),
                )
            }
        };
        (status, ErrorBody { code, message })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Persistence(err.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::SizeLimitExceeded { limit, .. } => {
                AppError::Validation(format!("Photo exceeds maximum size of {limit} bytes"))
            }
            other => AppError::UploadFailed(other.to_string()),
        }
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::MissingKey => AppError::Configuration(err.to_string()),
            TokenError::Jwt(_) => AppError::Internal(err.to_string()),
        }
    }
}
