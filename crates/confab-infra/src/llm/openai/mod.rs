//! OpenAiClient -- concrete [`CompletionClient`] implementation for the
//! OpenAI Chat Completions API.
//!
//! Sends requests to `/chat/completions` with bearer authentication. Vision
//! requests inline the image as a base64 data URI content part.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

mod types;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use confab_core::llm::client::CompletionClient;
use confab_types::llm::{
    CompletionError, CompletionRequest, CompletionResponse, Role, Usage, VisionRequest,
};

use types::{
    OpenAiContent, OpenAiContentPart, OpenAiImageUrl, OpenAiMessage, OpenAiRequest, OpenAiResponse,
};

/// OpenAI completion client.
///
/// Implements [`CompletionClient`] for the Chat Completions API.
///
/// # API Key Security
///
/// The API key is stored as a [`SecretString`] and is only exposed when
/// constructing the Authorization header. It never appears in Debug output,
/// Display output, or tracing logs.
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl OpenAiClient {
    /// Create a new OpenAI client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - OpenAI API key wrapped in SecretString
    /// * `model` - Default model identifier (e.g., "gpt-4o-mini")
    /// * `timeout` - Per-request timeout, completion calls included
    pub fn new(api_key: SecretString, model: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            base_url: "https://api.openai.com/v1".to_string(),
            model,
        }
    }

    /// The default model for this client.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Build the full API URL for a given path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Convert a generic [`CompletionRequest`] into an [`OpenAiRequest`].
    fn to_wire_request(&self, request: &CompletionRequest) -> OpenAiRequest {
        let messages = request
            .messages
            .iter()
            .map(|turn| OpenAiMessage {
                role: turn.role.to_string(),
                content: OpenAiContent::Text(turn.content.clone()),
            })
            .collect();

        OpenAiRequest {
            model: request
                .model
                .clone()
                .unwrap_or_else(|| self.model.clone()),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }

    /// Convert a [`VisionRequest`] into a multimodal [`OpenAiRequest`].
    fn to_vision_wire_request(&self, request: &VisionRequest) -> OpenAiRequest {
        let parts = vec![
            OpenAiContentPart::Text {
                text: request.prompt.clone(),
            },
            OpenAiContentPart::ImageUrl {
                image_url: OpenAiImageUrl::from_attachment(&request.image),
            },
        ];

        OpenAiRequest {
            model: request
                .model
                .clone()
                .unwrap_or_else(|| self.model.clone()),
            messages: vec![OpenAiMessage {
                role: Role::User.to_string(),
                content: OpenAiContent::Parts(parts),
            }],
            max_tokens: Some(request.max_tokens),
            temperature: None,
        }
    }

    /// POST a request body and map the response into domain types.
    async fn post_chat(&self, body: &OpenAiRequest) -> Result<CompletionResponse, CompletionError> {
        let url = self.url("/chat/completions");
        tracing::debug!(url = %url, model = %body.model, "OpenAI chat completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(|e| CompletionError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %error_body, "OpenAI API error response");
            return Err(match status.as_u16() {
                401 => CompletionError::AuthenticationFailed,
                429 => CompletionError::RateLimited {
                    retry_after_ms: None,
                },
                _ => CompletionError::Provider {
                    message: format!("HTTP {status}: {error_body}"),
                },
            });
        }

        let wire: OpenAiResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::Deserialization(format!("failed to parse response: {e}")))?;

        let choice = wire
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CompletionError::Provider {
                message: "response contained no choices".to_string(),
            })?;

        Ok(CompletionResponse {
            content: choice.message.content.unwrap_or_default(),
            model: wire.model,
            usage: Usage {
                input_tokens: wire.usage.prompt_tokens,
                output_tokens: wire.usage.completion_tokens,
            },
        })
    }
}

// OpenAiClient intentionally does NOT derive Debug so the SecretString
// field can never leak through formatting.

impl CompletionClient for OpenAiClient {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, CompletionError> {
        let body = self.to_wire_request(request);
        self.post_chat(&body).await
    }

    async fn complete_with_image(
        &self,
        request: &VisionRequest,
    ) -> Result<CompletionResponse, CompletionError> {
        let body = self.to_vision_wire_request(request);
        self.post_chat(&body).await
    }
}
