//! ChatRepository trait definition.
//!
//! Provides CRUD operations for chats and their messages.
//! Follows the same RPITIT pattern as UserRepository.

use confab_types::chat::{Chat, Message};
use confab_types::error::RepositoryError;
use uuid::Uuid;

/// Repository trait for chat and message persistence.
///
/// Implementations live in confab-infra (e.g., `SqliteChatRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait ChatRepository: Send + Sync {
    /// Insert a new chat.
    fn create_chat(
        &self,
        chat: &Chat,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Get a chat by its unique id.
    fn get_chat(
        &self,
        chat_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Chat>, RepositoryError>> + Send;

    /// List chats for a user, ordered by created_at ASC.
    fn list_chats(
        &self,
        user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<Chat>, RepositoryError>> + Send;

    /// The id of the user's oldest chat, if any.
    fn first_chat_id(
        &self,
        user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Uuid>, RepositoryError>> + Send;

    /// Delete a chat owned by the given user, cascading to its messages.
    ///
    /// Returns `RepositoryError::NotFound` when no row matches both ids,
    /// so a foreign chat id and a missing one are indistinguishable.
    fn delete_chat(
        &self,
        chat_id: &Uuid,
        user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Replace the chat title and bump its updated_at.
    ///
    /// Returns `RepositoryError::NotFound` when the chat does not exist.
    fn update_title(
        &self,
        chat_id: &Uuid,
        title: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Insert a new message.
    fn insert_message(
        &self,
        message: &Message,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete a single message by id.
    fn delete_message(
        &self,
        message_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Get all messages in a chat, ordered by created_at ASC (ties by id).
    fn get_messages(
        &self,
        chat_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, RepositoryError>> + Send;

    /// The total number of messages in a chat.
    fn count_messages(
        &self,
        chat_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
