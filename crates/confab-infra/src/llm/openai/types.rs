//! OpenAI Chat Completions API types.
//!
//! These are OpenAI-specific request/response structures used for HTTP
//! communication with the Chat Completions endpoint. They are NOT the
//! generic completion types from confab-types -- those are provider-neutral.

use base64::Engine;
use serde::{Deserialize, Serialize};

use confab_types::llm::ImageAttachment;

/// Request body for the Chat Completions API.
#[derive(Debug, Clone, Serialize)]
pub struct OpenAiRequest {
    pub model: String,
    pub messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// A single message in a Chat Completions conversation.
///
/// Content is a plain string for text-only turns and an array of typed
/// parts for multimodal turns; the API accepts both shapes.
#[derive(Debug, Clone, Serialize)]
pub struct OpenAiMessage {
    pub role: String,
    pub content: OpenAiContent,
}

/// The two content encodings the API accepts.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum OpenAiContent {
    Text(String),
    Parts(Vec<OpenAiContentPart>),
}

/// A typed part of a multimodal message.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum OpenAiContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: OpenAiImageUrl },
}

/// An image reference, inlined as a base64 data URI.
#[derive(Debug, Clone, Serialize)]
pub struct OpenAiImageUrl {
    pub url: String,
}

impl OpenAiImageUrl {
    /// Encode an attachment as a `data:` URI.
    pub fn from_attachment(image: &ImageAttachment) -> Self {
        let payload = base64::engine::general_purpose::STANDARD.encode(&image.data);
        Self {
            url: format!("data:{};base64,{payload}", image.media_type.mime()),
        }
    }
}

/// Response body from the Chat Completions API.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiResponse {
    pub choices: Vec<OpenAiChoice>,
    pub model: String,
    #[serde(default)]
    pub usage: OpenAiUsage,
}

/// One completion choice.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiChoice {
    pub message: OpenAiChoiceMessage,
}

/// The assistant message inside a choice.
///
/// `content` is null for tool-call responses, which this client never
/// requests but may still receive from misbehaving proxies.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Token usage from OpenAI.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenAiUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
}
