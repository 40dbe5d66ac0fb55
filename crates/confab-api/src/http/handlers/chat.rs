//! Chat CRUD HTTP handlers.
//!
//! Endpoints:
//! - GET    /users/{user_id}/chats                    - List the user's chats
//! - POST   /users/{user_id}/chats                    - Create an empty chat
//! - DELETE /users/{user_id}/chats/{chat_id}          - Delete a chat
//! - GET    /users/{user_id}/chats/{chat_id}/messages - Conversation history
//!
//! Every route is scoped under `/users/{user_id}`, and the path user must be
//! the token subject. A mismatch answers 404, so a caller probing foreign ids
//! cannot tell a wrong owner from a missing resource.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Serialize;
use uuid::Uuid;

use confab_types::chat::{Chat, Message};

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::state::AppState;

/// Chat listing envelope.
#[derive(Debug, Serialize)]
pub struct ChatListResponse {
    pub chats: Vec<Chat>,
}

/// Parse a UUID from a path parameter, returning a 400 error on invalid format.
pub(crate) fn parse_uuid(s: &str) -> Result<Uuid, AppError> {
    s.parse::<Uuid>()
        .map_err(|_| AppError::Validation(format!("Invalid UUID: {s}")))
}

/// Check that the path user segment names the authenticated caller.
pub(crate) fn authorize_path_user(path_user: &str, caller_id: &Uuid) -> Result<Uuid, AppError> {
    let user_id = parse_uuid(path_user)?;
    if user_id != *caller_id {
        return Err(AppError::NotFound);
    }
    Ok(user_id)
}

/// GET /users/{user_id}/chats - List the user's chats, oldest first.
pub async fn list_chats(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(user_id): Path<String>,
) -> Result<Json<ChatListResponse>, AppError> {
    let user_id = authorize_path_user(&user_id, &caller.id)?;
    let chats = state.chat_service.list_chats(&user_id).await?;
    Ok(Json(ChatListResponse { chats }))
}

/// POST /users/{user_id}/chats - Create an empty chat with the placeholder title.
pub async fn create_chat(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(user_id): Path<String>,
) -> Result<(StatusCode, Json<Chat>), AppError> {
    let user_id = authorize_path_user(&user_id, &caller.id)?;
    let chat = state.chat_service.create_chat(user_id).await?;
    Ok((StatusCode::CREATED, Json(chat)))
}

/// DELETE /users/{user_id}/chats/{chat_id} - Delete a chat and its messages.
pub async fn delete_chat(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path((user_id, chat_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let user_id = authorize_path_user(&user_id, &caller.id)?;
    let chat_id = parse_uuid(&chat_id)?;
    state.chat_service.delete_chat(&chat_id, &user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /users/{user_id}/chats/{chat_id}/messages - Conversation history.
///
/// An existing chat with no messages answers an empty array, not 404.
pub async fn get_messages(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path((user_id, chat_id)): Path<(String, String)>,
) -> Result<Json<Vec<Message>>, AppError> {
    let user_id = authorize_path_user(&user_id, &caller.id)?;
    let chat_id = parse_uuid(&chat_id)?;
    let messages = state.chat_service.history(&chat_id, &user_id).await?;
    Ok(Json(messages))
}
