//! Turn orchestration: the persist-complete-persist pipeline.
//!
//! One inbound user contribution produces exactly one persisted user
//! message and exactly one persisted assistant message, plus at most one
//! title assignment. Provider failures are absorbed into the assistant
//! message so the transcript shows what happened; only validation and
//! persistence failures reject the turn.

use chrono::{Duration, Utc};
use confab_types::chat::{Chat, Message, MessageRole};
use confab_types::config::LlmConfig;
use confab_types::llm::{ChatTurn, CompletionError, CompletionRequest, ImageAttachment, VisionRequest};
use confab_types::error::TurnError;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::chat::title::{derive_title, image_turn_title};
use crate::llm::client::CompletionClient;
use crate::repository::chat::ChatRepository;
use crate::storage::UploadStore;

/// Number of messages at or below which an image turn may still set the
/// synthesized title (one user + one assistant insert on a fresh chat).
const IMAGE_TITLE_MESSAGE_LIMIT: u64 = 2;

/// Result of a text turn: both persisted messages and the title set
/// during the turn, if any.
#[derive(Debug, Clone)]
pub struct TextTurnOutcome {
    pub user_message: Message,
    pub assistant_message: Message,
    /// Derived on a first turn, caller-supplied on later ones; `None`
    /// when no title was assigned.
    pub title: Option<String>,
}

/// Result of an image turn.
#[derive(Debug, Clone)]
pub struct ImageTurnOutcome {
    pub user_message: Message,
    pub assistant_message: Message,
    /// Generated object name the blob was stored under.
    pub stored_filename: String,
}

/// Orchestrates conversational turns against a chat.
///
/// Generic over its ports (`ChatRepository`, `CompletionClient`,
/// `UploadStore`) so the pipeline can be exercised without a database,
/// a provider, or a filesystem.
pub struct TurnService<R: ChatRepository, C: CompletionClient, U: UploadStore> {
    chats: R,
    client: C,
    uploads: U,
    llm: LlmConfig,
}

impl<R: ChatRepository, C: CompletionClient, U: UploadStore> TurnService<R, C, U> {
    /// Create a new turn service with the given ports and model settings.
    pub fn new(chats: R, client: C, uploads: U, llm: LlmConfig) -> Self {
        Self {
            chats,
            client,
            uploads,
            llm,
        }
    }

    /// Run one text turn against a chat the user owns.
    ///
    /// Pipeline: ownership check, title step (derive on first turn,
    /// apply the supplied title otherwise), persist the user message,
    /// single-turn completion, persist the assistant message. A provider
    /// failure lands in the transcript; a persistence failure after the
    /// user write removes the orphaned user message before returning.
    #[tracing::instrument(
        name = "submit_text_turn",
        skip(self, content, supplied_title),
        fields(chat_id = %chat_id)
    )]
    pub async fn submit_text_turn(
        &self,
        chat_id: &Uuid,
        user_id: &Uuid,
        content: &str,
        supplied_title: Option<&str>,
    ) -> Result<TextTurnOutcome, TurnError> {
        if content.trim().is_empty() {
            return Err(TurnError::EmptyContent);
        }

        self.owned_chat(chat_id, user_id).await?;

        // First turn: derive a title from the content; failures never
        // block the turn. Later turns: the caller may rename the chat.
        let prior_messages = self.chats.count_messages(chat_id).await?;
        let title = if prior_messages == 0 {
            match derive_title(&self.client, content, &self.llm.title_model).await {
                Ok(derived) => self.apply_title(chat_id, &derived).await,
                Err(e) => {
                    warn!(chat_id = %chat_id, error = %e, "Title derivation failed");
                    None
                }
            }
        } else if let Some(supplied) = supplied_title {
            self.apply_title(chat_id, supplied).await
        } else {
            None
        };

        // No assistant turn is attempted without a persisted user turn.
        let user_message = new_message(
            chat_id,
            Some(*user_id),
            MessageRole::User,
            content.to_string(),
            None,
        );
        self.chats.insert_message(&user_message).await?;

        // Single-turn request: only this content, no history replay.
        let request = CompletionRequest {
            model: Some(self.llm.model.clone()),
            messages: vec![ChatTurn::user(content)],
            max_tokens: None,
            temperature: None,
        };

        let assistant_content = match self.client.complete(&request).await {
            Ok(response) => response.content,
            Err(e) => {
                warn!(chat_id = %chat_id, error = %e, "Completion failed; recording in transcript");
                error_envelope(&e)
            }
        };

        let assistant_message = self.persist_assistant(&user_message, assistant_content).await?;

        info!(chat_id = %chat_id, "Text turn completed");
        Ok(TextTurnOutcome {
            user_message,
            assistant_message,
            title,
        })
    }

    /// Run one image turn against a chat the user owns.
    ///
    /// The blob is validated and stored first; the user message carries
    /// the prompt as its content and the generated object name. The
    /// vision completion follows the same absorb-on-failure policy as the
    /// text path. While the chat is still on its first exchange, the
    /// title becomes a synthesized string derived from the prompt.
    #[tracing::instrument(
        name = "submit_image_turn",
        skip(self, image_bytes, filename_hint, prompt),
        fields(chat_id = %chat_id, bytes = image_bytes.len())
    )]
    pub async fn submit_image_turn(
        &self,
        chat_id: &Uuid,
        user_id: &Uuid,
        image_bytes: &[u8],
        filename_hint: &str,
        prompt: &str,
    ) -> Result<ImageTurnOutcome, TurnError> {
        self.owned_chat(chat_id, user_id).await?;

        let stored = self.uploads.save(image_bytes, filename_hint).await?;

        let user_message = new_message(
            chat_id,
            Some(*user_id),
            MessageRole::User,
            prompt.to_string(),
            Some(stored.filename.clone()),
        );
        self.chats.insert_message(&user_message).await?;

        let request = VisionRequest {
            model: Some(self.llm.model.clone()),
            prompt: prompt.to_string(),
            image: ImageAttachment {
                media_type: stored.media_type,
                data: image_bytes.to_vec(),
            },
            max_tokens: self.llm.vision_max_tokens,
        };

        let assistant_content = match self.client.complete_with_image(&request).await {
            Ok(response) => response.content,
            Err(e) => {
                warn!(chat_id = %chat_id, error = %e, "Vision completion failed; recording in transcript");
                error_envelope(&e)
            }
        };

        let assistant_message = self.persist_assistant(&user_message, assistant_content).await?;

        // Young chat: synthesize a title from the prompt, no model call.
        match self.chats.count_messages(chat_id).await {
            Ok(n) if n <= IMAGE_TITLE_MESSAGE_LIMIT => {
                self.apply_title(chat_id, &image_turn_title(prompt)).await;
            }
            Ok(_) => {}
            Err(e) => {
                warn!(chat_id = %chat_id, error = %e, "Message count failed; skipping image title");
            }
        }

        info!(chat_id = %chat_id, filename = %stored.filename, "Image turn completed");
        Ok(ImageTurnOutcome {
            user_message,
            assistant_message,
            stored_filename: stored.filename,
        })
    }

    /// Load the chat and verify ownership.
    ///
    /// A missing chat and a chat owned by someone else are the same
    /// `ChatNotFound` so the response leaks nothing about other users.
    async fn owned_chat(&self, chat_id: &Uuid, user_id: &Uuid) -> Result<Chat, TurnError> {
        self.chats
            .get_chat(chat_id)
            .await?
            .filter(|chat| chat.user_id == *user_id)
            .ok_or(TurnError::ChatNotFound)
    }

    /// Persist a title, absorbing failures: a chat stuck on the
    /// placeholder title is better than a failed turn.
    async fn apply_title(&self, chat_id: &Uuid, title: &str) -> Option<String> {
        match self.chats.update_title(chat_id, title).await {
            Ok(()) => {
                info!(chat_id = %chat_id, "Chat title assigned");
                Some(title.to_string())
            }
            Err(e) => {
                warn!(chat_id = %chat_id, error = %e, "Failed to persist chat title");
                None
            }
        }
    }

    /// Persist the assistant message, ordered strictly after the user
    /// message. If the insert fails the orphaned user message is removed
    /// (best effort) so the transcript never shows a reply-less turn.
    async fn persist_assistant(
        &self,
        user_message: &Message,
        content: String,
    ) -> Result<Message, TurnError> {
        let mut created_at = Utc::now();
        if created_at <= user_message.created_at {
            created_at = user_message.created_at + Duration::microseconds(1);
        }

        let assistant_message = Message {
            id: Uuid::now_v7(),
            chat_id: user_message.chat_id,
            user_id: None,
            role: MessageRole::Assistant,
            content,
            image_filename: None,
            created_at,
            updated_at: created_at,
        };

        if let Err(e) = self.chats.insert_message(&assistant_message).await {
            if let Err(cleanup) = self.chats.delete_message(&user_message.id).await {
                warn!(
                    message_id = %user_message.id,
                    error = %cleanup,
                    "Failed to remove orphaned user message"
                );
            }
            return Err(TurnError::Repository(e));
        }

        Ok(assistant_message)
    }
}

fn new_message(
    chat_id: &Uuid,
    user_id: Option<Uuid>,
    role: MessageRole,
    content: String,
    image_filename: Option<String>,
) -> Message {
    let now = Utc::now();
    Message {
        id: Uuid::now_v7(),
        chat_id: *chat_id,
        user_id,
        role,
        content,
        image_filename,
        created_at: now,
        updated_at: now,
    }
}

/// Serialize a provider failure for the transcript.
fn error_envelope(err: &CompletionError) -> String {
    json!({ "error": err.to_string() }).to_string()
}
