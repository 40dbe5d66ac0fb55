use thiserror::Error;

use crate::llm::CompletionError;

/// Errors from repository operations (used by trait definitions in confab-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors related to account registration and login.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("email already registered")]
    EmailTaken,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("invalid or expired token")]
    InvalidToken,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("password hashing error: {0}")]
    Hash(String),

    #[error("token signing error: {0}")]
    Token(String),

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Errors related to chat container operations.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("chat not found")]
    NotFound,

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Errors related to image upload validation and storage.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("file type '{0}' is not allowed")]
    InvalidFileType(String),

    #[error("file too large: {size} bytes (max {max})")]
    FileTooLarge { size: usize, max: usize },

    #[error("invalid image payload: {0}")]
    InvalidPayload(String),

    #[error("storage error: {0}")]
    Io(String),
}

/// Errors from submitting a turn to a chat.
///
/// Completion failures are not represented here: the orchestrator absorbs
/// them into the assistant message rather than failing the turn.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("chat not found")]
    ChatNotFound,

    #[error("message content must not be empty")]
    EmptyContent,

    #[error("upload error: {0}")]
    Upload(#[from] UploadError),

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Errors from title derivation.
#[derive(Debug, Error)]
pub enum TitleError {
    #[error("completion error: {0}")]
    Completion(#[from] CompletionError),

    #[error("provider returned an empty title")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_auth_error_display() {
        assert_eq!(
            AuthError::EmailTaken.to_string(),
            "email already registered"
        );
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "invalid email or password"
        );
    }

    #[test]
    fn test_upload_error_display() {
        let err = UploadError::FileTooLarge {
            size: 11,
            max: 10,
        };
        assert_eq!(err.to_string(), "file too large: 11 bytes (max 10)");

        let err = UploadError::InvalidFileType("exe".to_string());
        assert_eq!(err.to_string(), "file type 'exe' is not allowed");
    }

    #[test]
    fn test_turn_error_from_repository() {
        let err = TurnError::from(RepositoryError::NotFound);
        assert!(matches!(err, TurnError::Repository(_)));
    }
}
