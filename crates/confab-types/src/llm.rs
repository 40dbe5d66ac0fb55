//! LLM request/response types for Confab.
//!
//! These types model the data shapes for completion provider interactions:
//! completion requests, vision requests with image attachments, usage
//! tracking, and error handling. They are provider-neutral; the wire
//! format lives with the client implementation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::chat::MessageRole;

/// Role of a turn in a completion request.
///
/// Wider than [`MessageRole`]: the persisted schema only knows user and
/// assistant, but requests may carry a system turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(Role::System),
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            other => Err(format!("invalid role: '{other}'")),
        }
    }
}

impl From<MessageRole> for Role {
    fn from(role: MessageRole) -> Self {
        match role {
            MessageRole::User => Role::User,
            MessageRole::Assistant => Role::Assistant,
        }
    }
}

/// A single turn in a completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Request to a completion provider.
///
/// `model` falls back to the client's configured default when `None`.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: Option<String>,
    pub messages: Vec<ChatTurn>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
}

/// Media type of an uploaded image, as tagged in vision requests.
///
/// Narrower than the upload allow-list: bmp may be stored, but providers
/// are only told about these four types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMediaType {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl ImageMediaType {
    /// Derive the media type from a file extension (without the dot).
    ///
    /// Anything unrecognized, bmp included, falls back to JPEG.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "png" => ImageMediaType::Png,
            "gif" => ImageMediaType::Gif,
            "webp" => ImageMediaType::Webp,
            _ => ImageMediaType::Jpeg,
        }
    }

    /// The MIME type string used in data URIs.
    pub fn mime(&self) -> &'static str {
        match self {
            ImageMediaType::Jpeg => "image/jpeg",
            ImageMediaType::Png => "image/png",
            ImageMediaType::Gif => "image/gif",
            ImageMediaType::Webp => "image/webp",
        }
    }
}

/// Raw image bytes plus their media type, ready for a vision request.
#[derive(Clone)]
pub struct ImageAttachment {
    pub media_type: ImageMediaType,
    pub data: Vec<u8>,
}

impl fmt::Debug for ImageAttachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageAttachment")
            .field("media_type", &self.media_type)
            .field("data_len", &self.data.len())
            .finish()
    }
}

/// Request to a completion provider that includes an image.
#[derive(Debug, Clone)]
pub struct VisionRequest {
    pub model: Option<String>,
    pub prompt: String,
    pub image: ImageAttachment,
    pub max_tokens: u32,
}

/// Token usage for a completion request/response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Response from a completion provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub content: String,
    pub model: String,
    pub usage: Usage,
}

/// Errors from completion provider operations.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("authentication failed")]
    AuthenticationFailed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in [Role::System, Role::User, Role::Assistant] {
            let s = role.to_string();
            let parsed: Role = s.parse().unwrap();
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn test_role_from_message_role() {
        assert_eq!(Role::from(MessageRole::User), Role::User);
        assert_eq!(Role::from(MessageRole::Assistant), Role::Assistant);
    }

    #[test]
    fn test_media_type_from_extension() {
        assert_eq!(ImageMediaType::from_extension("png"), ImageMediaType::Png);
        assert_eq!(ImageMediaType::from_extension("JPG"), ImageMediaType::Jpeg);
        assert_eq!(ImageMediaType::from_extension("webp"), ImageMediaType::Webp);
        // bmp is storable but has no recognized MIME tag.
        assert_eq!(ImageMediaType::from_extension("bmp"), ImageMediaType::Jpeg);
        assert_eq!(ImageMediaType::from_extension("tiff"), ImageMediaType::Jpeg);
    }

    #[test]
    fn test_media_type_mime() {
        assert_eq!(ImageMediaType::Png.mime(), "image/png");
        assert_eq!(ImageMediaType::Jpeg.mime(), "image/jpeg");
    }

    #[test]
    fn test_image_attachment_debug_hides_bytes() {
        let attachment = ImageAttachment {
            media_type: ImageMediaType::Png,
            data: vec![0u8; 4096],
        };
        let debug = format!("{attachment:?}");
        assert!(debug.contains("data_len"));
        assert!(debug.contains("4096"));
    }

    #[test]
    fn test_completion_error_display() {
        let err = CompletionError::Provider {
            message: "model overloaded".to_string(),
        };
        assert_eq!(err.to_string(), "provider error: model overloaded");
    }
}
