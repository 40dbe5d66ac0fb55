//! UserRepository trait definition.
//!
//! Provides account persistence for registration and login.

use confab_types::error::RepositoryError;
use confab_types::user::User;
use uuid::Uuid;

/// Repository trait for user account persistence.
///
/// Implementations live in confab-infra (e.g., `SqliteUserRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait UserRepository: Send + Sync {
    /// Insert a new user record.
    ///
    /// Returns `RepositoryError::Conflict` if the email is already taken
    /// (uniqueness is case-insensitive).
    fn create_user(
        &self,
        user: &User,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Look up a user by email (case-insensitive).
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Look up a user by id.
    fn find_by_id(
        &self,
        user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;
}
