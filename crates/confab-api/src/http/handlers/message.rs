//! Text turn HTTP handler.
//!
//! Endpoint:
//! - POST /users/{user_id}/chats/{chat_id}/messages - Submit a message and
//!   get the assistant reply in the same response.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use confab_types::chat::Message;

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::handlers::chat::{authorize_path_user, parse_uuid};
use crate::state::AppState;

/// Request body for a text turn.
#[derive(Debug, Deserialize)]
pub struct SubmitMessageRequest {
    pub content: String,
    /// Optional title for the chat. Ignored on a first turn, where the
    /// title is derived from the message itself.
    #[serde(default)]
    pub title: Option<String>,
}

/// Both halves of a completed turn, plus the title if one was assigned.
#[derive(Debug, Serialize)]
pub struct SubmitMessageResponse {
    pub user: Message,
    pub assistant: Message,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// POST /users/{user_id}/chats/{chat_id}/messages - Run a full text turn.
///
/// Persists the user message, calls the completion provider, persists the
/// assistant reply, and answers with both records. Provider failures still
/// answer 201; the assistant content carries the error payload.
pub async fn submit_message(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path((user_id, chat_id)): Path<(String, String)>,
    Json(body): Json<SubmitMessageRequest>,
) -> Result<(StatusCode, Json<SubmitMessageResponse>), AppError> {
    let user_id = authorize_path_user(&user_id, &caller.id)?;
    let chat_id = parse_uuid(&chat_id)?;

    let outcome = state
        .turn_service
        .submit_text_turn(&chat_id, &user_id, &body.content, body.title.as_deref())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitMessageResponse {
            user: outcome.user_message,
            assistant: outcome.assistant_message,
            title: outcome.title,
        }),
    ))
}
