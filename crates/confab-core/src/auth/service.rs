//! Account registration and login orchestration.
//!
//! AuthService coordinates the UserRepository, PasswordHasher, and
//! TokenService ports: registration normalizes and reserves the email,
//! login exchanges credentials for a bearer token, and token resolution
//! turns a presented token back into a user record.

use chrono::Utc;
use confab_types::error::{AuthError, RepositoryError};
use confab_types::user::{NewUser, User};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::credentials::{PasswordHasher, TokenService};
use crate::repository::user::UserRepository;

/// Orchestrates account registration, login, and token resolution.
///
/// Generic over its ports to maintain clean architecture (confab-core
/// never depends on confab-infra).
pub struct AuthService<R: UserRepository, H: PasswordHasher, T: TokenService> {
    users: R,
    hasher: H,
    tokens: T,
}

impl<R: UserRepository, H: PasswordHasher, T: TokenService> AuthService<R, H, T> {
    /// Create a new auth service with the given ports.
    pub fn new(users: R, hasher: H, tokens: T) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Access the user repository.
    pub fn users(&self) -> &R {
        &self.users
    }

    /// Register a new account.
    ///
    /// The email is trimmed and lowercased before storage so lookups are
    /// case-insensitive. A taken email maps to `AuthError::EmailTaken`,
    /// whether it is caught by the pre-check or by the unique constraint.
    pub async fn register(&self, new_user: NewUser) -> Result<User, AuthError> {
        let username = new_user.username.trim().to_string();
        if username.is_empty() {
            return Err(AuthError::InvalidInput(
                "username cannot be empty".to_string(),
            ));
        }

        let email = new_user.email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(AuthError::InvalidInput(
                "email must be a valid address".to_string(),
            ));
        }

        if new_user.password.is_empty() {
            return Err(AuthError::InvalidInput(
                "password cannot be empty".to_string(),
            ));
        }

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let user = User {
            id: Uuid::now_v7(),
            username,
            email,
            hashed_password: self.hasher.hash(&new_user.password)?,
            created_at: Utc::now(),
        };

        // The unique constraint still guards the pre-check race.
        self.users.create_user(&user).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::EmailTaken,
            other => AuthError::Repository(other),
        })?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Exchange credentials for a bearer token.
    ///
    /// Unknown email and wrong password both return
    /// `AuthError::InvalidCredentials` so the response does not reveal
    /// which accounts exist.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), AuthError> {
        let email = email.trim().to_lowercase();

        let Some(user) = self.users.find_by_email(&email).await? else {
            return Err(AuthError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &user.hashed_password)? {
            warn!(user_id = %user.id, "Login rejected: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(&user.id)?;
        info!(user_id = %user.id, "User logged in");
        Ok((user, token))
    }

    /// Resolve a presented bearer token to its user record.
    ///
    /// A valid token whose account no longer exists maps to
    /// `AuthError::InvalidToken`.
    pub async fn resolve_token(&self, token: &str) -> Result<User, AuthError> {
        let user_id = self.tokens.decode(token)?;
        match self.users.find_by_id(&user_id).await? {
            Some(user) => Ok(user),
            None => {
                warn!(user_id = %user_id, "Token subject no longer exists");
                Err(AuthError::InvalidToken)
            }
        }
    }
}
