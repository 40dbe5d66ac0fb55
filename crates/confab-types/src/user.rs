//! User account types for Confab.
//!
//! `User` is the persisted record; `PublicUser` is the shape exposed over
//! the API. The password hash never leaves the backend: it is skipped
//! during serialization and absent from `PublicUser` entirely.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    /// Stored lowercased; uniqueness is case-insensitive.
    pub email: String,
    /// Argon2 hash of the password. Never serialized.
    #[serde(skip_serializing, default)]
    pub hashed_password: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a user account.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// The user shape returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    #[serde(rename = "user_id")]
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
        }
    }
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
        }
    }
}
