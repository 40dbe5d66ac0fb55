//! Image turn HTTP handler.
//!
//! Endpoint:
//! - POST /users/{user_id}/chats/{chat_id}/images - Upload an image and run
//!   a vision turn over it.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use confab_types::chat::Message;
use confab_types::error::{TurnError, UploadError};

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::handlers::chat::{authorize_path_user, parse_uuid};
use crate::state::AppState;

/// Prompt sent to the vision model when the caller supplies none.
const DEFAULT_PROMPT: &str = "What do you see in this image?";

/// Request body for an image turn.
#[derive(Debug, Deserialize)]
pub struct SubmitImageRequest {
    /// Base64 payload, with or without a `data:<mime>;base64,` prefix.
    pub image_data: String,
    /// Client-side filename. Only its extension matters.
    pub filename: String,
    #[serde(default)]
    pub prompt: Option<String>,
}

/// Both halves of a completed vision turn.
#[derive(Debug, Serialize)]
pub struct SubmitImageResponse {
    pub user_message: Message,
    pub assistant_message: Message,
    /// Server-generated name the image was stored under.
    pub stored_filename: String,
}

/// Strip an optional data-URI prefix and decode the base64 payload.
///
/// Raw base64 never contains a comma, so anything before one is a
/// `data:` header and gets discarded.
fn decode_image_payload(image_data: &str) -> Result<Vec<u8>, AppError> {
    let payload = match image_data.split_once(',') {
        Some((_, rest)) => rest,
        None => image_data,
    };
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| {
            AppError::Turn(TurnError::Upload(UploadError::InvalidPayload(
                e.to_string(),
            )))
        })
}

/// POST /users/{user_id}/chats/{chat_id}/images - Run a vision turn.
///
/// Decodes and stores the image, then runs the turn pipeline with the
/// stored file attached to the user message.
pub async fn submit_image(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path((user_id, chat_id)): Path<(String, String)>,
    Json(body): Json<SubmitImageRequest>,
) -> Result<(StatusCode, Json<SubmitImageResponse>), AppError> {
    let user_id = authorize_path_user(&user_id, &caller.id)?;
    let chat_id = parse_uuid(&chat_id)?;

    let image_bytes = decode_image_payload(&body.image_data)?;
    let prompt = body
        .prompt
        .as_deref()
        .filter(|p| !p.trim().is_empty())
        .unwrap_or(DEFAULT_PROMPT);

    let outcome = state
        .turn_service
        .submit_image_turn(&chat_id, &user_id, &image_bytes, &body.filename, prompt)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitImageResponse {
            user_message: outcome.user_message,
            assistant_message: outcome.assistant_message,
            stored_filename: outcome.stored_filename,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_base64() {
        let encoded = base64::engine::general_purpose::STANDARD.encode(b"fakejpegdata");
        let bytes = decode_image_payload(&encoded).unwrap();
        assert_eq!(bytes, b"fakejpegdata");
    }

    #[test]
    fn test_decode_strips_data_uri_prefix() {
        let encoded = base64::engine::general_purpose::STANDARD.encode(b"fakepngdata");
        let uri = format!("data:image/png;base64,{encoded}");
        let bytes = decode_image_payload(&uri).unwrap();
        assert_eq!(bytes, b"fakepngdata");
    }

    #[test]
    fn test_decode_rejects_invalid_base64() {
        let err = decode_image_payload("this is !!! not base64").unwrap_err();
        assert!(matches!(
            err,
            AppError::Turn(TurnError::Upload(UploadError::InvalidPayload(_)))
        ));
    }
}
