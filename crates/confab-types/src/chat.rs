//! Chat and message types for Confab.
//!
//! These types model conversations between a user and the assistant:
//! the chat container and the ordered messages inside it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Title given to a chat before its first turn derives a real one.
pub const PLACEHOLDER_TITLE: &str = "New Chat";

/// Author of a persisted message.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (role IN ('user', 'assistant'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A conversation owned by a single user.
///
/// `updated_at` moves whenever the title changes; message inserts do not
/// touch it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single message within a chat.
///
/// Messages are ordered by `created_at` (ties broken by id) within a chat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub chat_id: Uuid,
    /// Author account for user messages; `None` for assistant messages.
    pub user_id: Option<Uuid>,
    pub role: MessageRole,
    pub content: String,
    /// Stored object name for image turns (user messages only).
    pub image_filename: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_role_roundtrip() {
        for role in [MessageRole::User, MessageRole::Assistant] {
            let s = role.to_string();
            let parsed: MessageRole = s.parse().unwrap();
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn test_message_role_serde() {
        let role = MessageRole::Assistant;
        let json = serde_json::to_string(&role).unwrap();
        assert_eq!(json, "\"assistant\"");
        let parsed: MessageRole = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, MessageRole::Assistant);
    }

    #[test]
    fn test_message_role_rejects_unknown() {
        let result: Result<MessageRole, _> = "system".parse();
        assert!(result.is_err());
    }

    #[test]
    fn test_message_serializes_optional_fields() {
        let message = Message {
            id: Uuid::now_v7(),
            chat_id: Uuid::now_v7(),
            user_id: None,
            role: MessageRole::Assistant,
            content: "hello".to_string(),
            image_filename: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json: serde_json::Value = serde_json::to_value(&message).unwrap();
        assert!(json["user_id"].is_null());
        assert_eq!(json["role"], "assistant");
    }
}
