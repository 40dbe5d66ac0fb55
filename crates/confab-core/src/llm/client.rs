//! CompletionClient trait definition.
//!
//! This is the core abstraction the turn orchestrator and title deriver
//! talk to. Uses RPITIT for both completion methods.

use confab_types::llm::{CompletionError, CompletionRequest, CompletionResponse, VisionRequest};

/// Trait for completion provider backends.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in confab-infra (e.g., `OpenAiClient`).
pub trait CompletionClient: Send + Sync {
    /// Human-readable provider name (e.g., "openai").
    fn name(&self) -> &str;

    /// Send a text completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, CompletionError>> + Send;

    /// Send a completion request that includes an image attachment.
    fn complete_with_image(
        &self,
        request: &VisionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, CompletionError>> + Send;
}
