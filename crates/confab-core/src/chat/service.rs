//! Chat container lifecycle: creation, listing, deletion, history.
//!
//! ChatService owns everything about chats except running turns, which is
//! `TurnService`'s job. Every operation that reads or mutates a specific
//! chat checks ownership so a foreign chat id behaves like a missing one.

use confab_types::chat::{Chat, Message, PLACEHOLDER_TITLE};
use confab_types::error::{ChatError, RepositoryError};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::repository::chat::ChatRepository;

/// Orchestrates chat creation, listing, deletion, and history reads.
///
/// Generic over `ChatRepository` to maintain clean architecture
/// (confab-core never depends on confab-infra).
pub struct ChatService<R: ChatRepository> {
    chats: R,
}

impl<R: ChatRepository> ChatService<R> {
    /// Create a new chat service with the given repository.
    pub fn new(chats: R) -> Self {
        Self { chats }
    }

    /// Access the chat repository.
    pub fn chats(&self) -> &R {
        &self.chats
    }

    /// Create a new chat for a user with the placeholder title.
    pub async fn create_chat(&self, user_id: Uuid) -> Result<Chat, ChatError> {
        let now = Utc::now();
        let chat = Chat {
            id: Uuid::now_v7(),
            user_id,
            title: PLACEHOLDER_TITLE.to_string(),
            created_at: now,
            updated_at: now,
        };

        self.chats.create_chat(&chat).await?;
        info!(chat_id = %chat.id, user_id = %user_id, "Chat created");
        Ok(chat)
    }

    /// List a user's chats, oldest first.
    pub async fn list_chats(&self, user_id: &Uuid) -> Result<Vec<Chat>, ChatError> {
        Ok(self.chats.list_chats(user_id).await?)
    }

    /// The id of the user's oldest chat, if any.
    ///
    /// Returned by login so clients can resume where they left off.
    pub async fn first_chat(&self, user_id: &Uuid) -> Result<Option<Uuid>, ChatError> {
        Ok(self.chats.first_chat_id(user_id).await?)
    }

    /// Delete a chat owned by the user; its messages cascade.
    pub async fn delete_chat(&self, chat_id: &Uuid, user_id: &Uuid) -> Result<(), ChatError> {
        self.chats
            .delete_chat(chat_id, user_id)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => ChatError::NotFound,
                other => ChatError::Repository(other),
            })?;
        info!(chat_id = %chat_id, "Chat deleted");
        Ok(())
    }

    /// Conversation history for a chat the user owns, oldest first.
    ///
    /// An empty chat yields an empty list, not an error.
    pub async fn history(&self, chat_id: &Uuid, user_id: &Uuid) -> Result<Vec<Message>, ChatError> {
        let chat = self
            .chats
            .get_chat(chat_id)
            .await?
            .filter(|c| c.user_id == *user_id)
            .ok_or(ChatError::NotFound)?;

        Ok(self.chats.get_messages(&chat.id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use confab_types::chat::MessageRole;
    use std::sync::Mutex;

    /// In-memory chat repository for service tests.
    struct InMemoryChatRepository {
        chats: Mutex<Vec<Chat>>,
        messages: Mutex<Vec<Message>>,
    }

    impl InMemoryChatRepository {
        fn new() -> Self {
            Self {
                chats: Mutex::new(Vec::new()),
                messages: Mutex::new(Vec::new()),
            }
        }
    }

    impl ChatRepository for InMemoryChatRepository {
        async fn create_chat(&self, chat: &Chat) -> Result<(), RepositoryError> {
            self.chats.lock().unwrap().push(chat.clone());
            Ok(())
        }

        async fn get_chat(&self, chat_id: &Uuid) -> Result<Option<Chat>, RepositoryError> {
            let chats = self.chats.lock().unwrap();
            Ok(chats.iter().find(|c| c.id == *chat_id).cloned())
        }

        async fn list_chats(&self, user_id: &Uuid) -> Result<Vec<Chat>, RepositoryError> {
            let mut chats: Vec<Chat> = self
                .chats
                .lock()
                .unwrap()
                .iter()
                .filter(|c| c.user_id == *user_id)
                .cloned()
                .collect();
            chats.sort_by_key(|c| c.created_at);
            Ok(chats)
        }

        async fn first_chat_id(&self, user_id: &Uuid) -> Result<Option<Uuid>, RepositoryError> {
            Ok(self.list_chats(user_id).await?.first().map(|c| c.id))
        }

        async fn delete_chat(&self, chat_id: &Uuid, user_id: &Uuid) -> Result<(), RepositoryError> {
            let mut chats = self.chats.lock().unwrap();
            let before = chats.len();
            chats.retain(|c| !(c.id == *chat_id && c.user_id == *user_id));
            if chats.len() == before {
                return Err(RepositoryError::NotFound);
            }
            self.messages.lock().unwrap().retain(|m| m.chat_id != *chat_id);
            Ok(())
        }

        async fn update_title(&self, chat_id: &Uuid, title: &str) -> Result<(), RepositoryError> {
            let mut chats = self.chats.lock().unwrap();
            let chat = chats
                .iter_mut()
                .find(|c| c.id == *chat_id)
                .ok_or(RepositoryError::NotFound)?;
            chat.title = title.to_string();
            chat.updated_at = Utc::now();
            Ok(())
        }

        async fn insert_message(&self, message: &Message) -> Result<(), RepositoryError> {
            self.messages.lock().unwrap().push(message.clone());
            Ok(())
        }

        async fn delete_message(&self, message_id: &Uuid) -> Result<(), RepositoryError> {
            self.messages.lock().unwrap().retain(|m| m.id != *message_id);
            Ok(())
        }

        async fn get_messages(&self, chat_id: &Uuid) -> Result<Vec<Message>, RepositoryError> {
            let mut messages: Vec<Message> = self
                .messages
                .lock()
                .unwrap()
                .iter()
                .filter(|m| m.chat_id == *chat_id)
                .cloned()
                .collect();
            messages.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
            Ok(messages)
        }

        async fn count_messages(&self, chat_id: &Uuid) -> Result<u64, RepositoryError> {
            Ok(self.get_messages(chat_id).await?.len() as u64)
        }
    }

    fn service() -> ChatService<InMemoryChatRepository> {
        ChatService::new(InMemoryChatRepository::new())
    }

    #[tokio::test]
    async fn test_create_chat_uses_placeholder_title() {
        let service = service();
        let user_id = Uuid::now_v7();
        let chat = service.create_chat(user_id).await.unwrap();
        assert_eq!(chat.title, PLACEHOLDER_TITLE);
        assert_eq!(chat.user_id, user_id);
    }

    #[tokio::test]
    async fn test_list_chats_scoped_to_user() {
        let service = service();
        let alice = Uuid::now_v7();
        let bob = Uuid::now_v7();
        service.create_chat(alice).await.unwrap();
        service.create_chat(alice).await.unwrap();
        service.create_chat(bob).await.unwrap();

        assert_eq!(service.list_chats(&alice).await.unwrap().len(), 2);
        assert_eq!(service.list_chats(&bob).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_first_chat_is_oldest() {
        let service = service();
        let user_id = Uuid::now_v7();
        let first = service.create_chat(user_id).await.unwrap();
        service.create_chat(user_id).await.unwrap();

        let found = service.first_chat(&user_id).await.unwrap();
        assert_eq!(found, Some(first.id));
    }

    #[tokio::test]
    async fn test_first_chat_none_for_new_user() {
        let service = service();
        let found = service.first_chat(&Uuid::now_v7()).await.unwrap();
        assert_eq!(found, None);
    }

    #[tokio::test]
    async fn test_delete_foreign_chat_is_not_found() {
        let service = service();
        let owner = Uuid::now_v7();
        let stranger = Uuid::now_v7();
        let chat = service.create_chat(owner).await.unwrap();

        let err = service.delete_chat(&chat.id, &stranger).await.unwrap_err();
        assert!(matches!(err, ChatError::NotFound));

        // The owner still sees the chat.
        assert_eq!(service.list_chats(&owner).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_history_checks_ownership() {
        let service = service();
        let owner = Uuid::now_v7();
        let stranger = Uuid::now_v7();
        let chat = service.create_chat(owner).await.unwrap();

        let message = Message {
            id: Uuid::now_v7(),
            chat_id: chat.id,
            user_id: Some(owner),
            role: MessageRole::User,
            content: "hello".to_string(),
            image_filename: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        service.chats().insert_message(&message).await.unwrap();

        let history = service.history(&chat.id, &owner).await.unwrap();
        assert_eq!(history.len(), 1);

        let err = service.history(&chat.id, &stranger).await.unwrap_err();
        assert!(matches!(err, ChatError::NotFound));
    }

    #[tokio::test]
    async fn test_history_empty_chat_is_empty_list() {
        let service = service();
        let user_id = Uuid::now_v7();
        let chat = service.create_chat(user_id).await.unwrap();
        let history = service.history(&chat.id, &user_id).await.unwrap();
        assert!(history.is_empty());
    }
}
