//! Application error type mapping to HTTP status codes and envelope format.
//!
//! Every failure leaves the API as `{"error": {"code", "message"}}` with
//! the status this module assigns.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use confab_types::error::{AuthError, ChatError, TurnError, UploadError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Registration/login/token errors.
    Auth(AuthError),
    /// Chat container errors.
    Chat(ChatError),
    /// Turn submission errors.
    Turn(TurnError),
    /// Authentication failure outside the auth service (missing header).
    Unauthorized(String),
    /// Resource not found. Also covers path-user mismatches, so foreign
    /// ids read the same as missing ones.
    NotFound,
    /// Validation error.
    Validation(String),
    /// Generic internal error.
    Internal(String),
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Auth(e)
    }
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl From<TurnError> for AppError {
    fn from(e: TurnError) -> Self {
        AppError::Turn(e)
    }
}

impl AppError {
    /// The (status, code, message) triple this error renders as.
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Auth(AuthError::EmailTaken) => (
                StatusCode::CONFLICT,
                "EMAIL_TAKEN",
                "Email already registered".to_string(),
            ),
            AppError::Auth(AuthError::InvalidCredentials) => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid email or password".to_string(),
            ),
            AppError::Auth(AuthError::InvalidToken) => (
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                "Invalid or expired token".to_string(),
            ),
            AppError::Auth(AuthError::InvalidInput(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Auth(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "AUTH_ERROR",
                e.to_string(),
            ),
            AppError::Chat(ChatError::NotFound) => (
                StatusCode::NOT_FOUND,
                "CHAT_NOT_FOUND",
                "Chat not found".to_string(),
            ),
            AppError::Chat(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CHAT_ERROR",
                e.to_string(),
            ),
            AppError::Turn(TurnError::ChatNotFound) => (
                StatusCode::NOT_FOUND,
                "CHAT_NOT_FOUND",
                "Chat not found".to_string(),
            ),
            AppError::Turn(TurnError::EmptyContent) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "Message content must not be empty".to_string(),
            ),
            AppError::Turn(TurnError::Upload(e @ UploadError::InvalidFileType(_))) => {
                (StatusCode::BAD_REQUEST, "INVALID_FILE_TYPE", e.to_string())
            }
            AppError::Turn(TurnError::Upload(e @ UploadError::FileTooLarge { .. })) => {
                (StatusCode::BAD_REQUEST, "FILE_TOO_LARGE", e.to_string())
            }
            AppError::Turn(TurnError::Upload(e @ UploadError::InvalidPayload(_))) => {
                (StatusCode::BAD_REQUEST, "INVALID_PAYLOAD", e.to_string())
            }
            AppError::Turn(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "TURN_ERROR",
                e.to_string(),
            ),
            AppError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
            }
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Not found".to_string(),
            ),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = json!({
            "error": {
                "code": code,
                "message": message,
            }
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
