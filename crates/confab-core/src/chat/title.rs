//! Chat title derivation via the completion provider.
//!
//! `derive_title` produces a short title for a chat from the first user
//! message. Image turns skip the model call and synthesize a title from
//! the prompt text instead.

use confab_types::error::TitleError;
use confab_types::llm::{ChatTurn, CompletionRequest};

use crate::llm::client::CompletionClient;

/// Instruction prepended to the seed text for the title call.
const TITLE_PROMPT: &str = "Can you make a brief title for this message?";

/// Output cap for the title call; titles are a few words.
const TITLE_MAX_TOKENS: u32 = 20;

/// Low temperature keeps titles close to the seed text.
const TITLE_TEMPERATURE: f64 = 0.3;

/// How much of the prompt a synthesized image-turn title keeps.
const IMAGE_TITLE_PROMPT_CHARS: usize = 30;

/// Derive a chat title from the first user message.
///
/// Sends a single completion call at low temperature (0.3) with a bounded
/// response length. The result is trimmed of whitespace and surrounding
/// quotes. Callers must treat failure as non-fatal: a chat with the
/// placeholder title is better than a failed turn.
#[tracing::instrument(name = "derive_title", skip(client, seed), fields(model = %model))]
pub async fn derive_title<C: CompletionClient>(
    client: &C,
    seed: &str,
    model: &str,
) -> Result<String, TitleError> {
    let request = CompletionRequest {
        model: Some(model.to_string()),
        messages: vec![ChatTurn::user(format!("{TITLE_PROMPT}\n\n{seed}"))],
        max_tokens: Some(TITLE_MAX_TOKENS),
        temperature: Some(TITLE_TEMPERATURE),
    };

    let response = client.complete(&request).await?;

    // Trim whitespace and surrounding quotes from the title
    let title = response
        .content
        .trim()
        .trim_matches('"')
        .trim_matches('\'')
        .trim()
        .to_string();

    if title.is_empty() {
        return Err(TitleError::Empty);
    }

    Ok(title)
}

/// Synthesize a title for an image turn from its prompt text.
///
/// No model call: the title is the prompt truncated to a fixed length.
pub fn image_turn_title(prompt: &str) -> String {
    let head: String = prompt.chars().take(IMAGE_TITLE_PROMPT_CHARS).collect();
    format!("Image Analysis: {head}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use confab_types::llm::{CompletionError, CompletionResponse, Usage, VisionRequest};
    use std::sync::Mutex;

    /// Completion client that replays a scripted response and records the
    /// request it was sent.
    struct ScriptedClient {
        reply: Result<String, String>,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedClient {
        fn replying(content: &str) -> Self {
            Self {
                reply: Ok(content.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl CompletionClient for ScriptedClient {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, CompletionError> {
            self.seen.lock().unwrap().push(request.clone());
            match &self.reply {
                Ok(content) => Ok(CompletionResponse {
                    content: content.clone(),
                    model: "scripted-model".to_string(),
                    usage: Usage::default(),
                }),
                Err(message) => Err(CompletionError::Provider {
                    message: message.clone(),
                }),
            }
        }

        async fn complete_with_image(
            &self,
            _request: &VisionRequest,
        ) -> Result<CompletionResponse, CompletionError> {
            unreachable!("title derivation never sends images")
        }
    }

    #[tokio::test]
    async fn test_derive_title_trims_quotes_and_whitespace() {
        let client = ScriptedClient::replying("  \"Rust Lifetime Questions\"  ");
        let title = derive_title(&client, "How do lifetimes work?", "title-model")
            .await
            .unwrap();
        assert_eq!(title, "Rust Lifetime Questions");
    }

    #[tokio::test]
    async fn test_derive_title_request_shape() {
        let client = ScriptedClient::replying("A Title");
        derive_title(&client, "seed text", "title-model").await.unwrap();

        let seen = client.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let request = &seen[0];
        assert_eq!(request.model.as_deref(), Some("title-model"));
        assert_eq!(request.max_tokens, Some(TITLE_MAX_TOKENS));
        assert_eq!(request.temperature, Some(TITLE_TEMPERATURE));
        assert_eq!(request.messages.len(), 1);
        assert!(request.messages[0].content.starts_with(TITLE_PROMPT));
        assert!(request.messages[0].content.ends_with("seed text"));
    }

    #[tokio::test]
    async fn test_derive_title_propagates_provider_error() {
        let client = ScriptedClient::failing("model overloaded");
        let err = derive_title(&client, "seed", "title-model").await.unwrap_err();
        assert!(matches!(err, TitleError::Completion(_)));
    }

    #[tokio::test]
    async fn test_derive_title_rejects_blank_reply() {
        let client = ScriptedClient::replying("  \"\"  ");
        let err = derive_title(&client, "seed", "title-model").await.unwrap_err();
        assert!(matches!(err, TitleError::Empty));
    }

    #[test]
    fn test_image_turn_title_truncates() {
        // First 30 characters of the prompt, then the ellipsis.
        let prompt = "Describe the painting over the fireplace in detail";
        let title = image_turn_title(prompt);
        assert_eq!(title, "Image Analysis: Describe the painting over the...");
    }

    #[test]
    fn test_image_turn_title_short_prompt() {
        assert_eq!(
            image_turn_title("What is this?"),
            "Image Analysis: What is this?..."
        );
    }

    #[test]
    fn test_image_turn_title_multibyte_safe() {
        // Truncation counts characters, not bytes.
        let prompt = "日本語のプロンプトで画像を説明してください。長い文章はここで切れます絶対に";
        let title = image_turn_title(prompt);
        assert!(title.starts_with("Image Analysis: 日本語"));
        assert!(title.ends_with("..."));
    }
}
