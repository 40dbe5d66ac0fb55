//! SQLite user repository implementation.
//!
//! Implements `UserRepository` from `confab-core` using sqlx with split
//! read/write pools: raw queries, a private Row struct, and RFC 3339 TEXT
//! timestamps.

use confab_core::repository::user::UserRepository;
use confab_types::error::RepositoryError;
use confab_types::user::User;
use sqlx::Row;
use uuid::Uuid;

use super::chat::{format_datetime, parse_datetime};
use super::pool::DatabasePool;

/// SQLite-backed implementation of `UserRepository`.
pub struct SqliteUserRepository {
    pool: DatabasePool,
}

impl SqliteUserRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain User.
struct UserRow {
    id: String,
    username: String,
    email: String,
    hashed_password: String,
    created_at: String,
}

impl UserRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            hashed_password: row.try_get("hashed_password")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_user(self) -> Result<User, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid user id: {e}")))?;
        let created_at = parse_datetime(&self.created_at)?;

        Ok(User {
            id,
            username: self.username,
            email: self.email,
            hashed_password: self.hashed_password,
            created_at,
        })
    }
}

impl UserRepository for SqliteUserRepository {
    async fn create_user(&self, user: &User) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO users (id, username, email, hashed_password, created_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(user.id.to_string())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.hashed_password)
        .bind(format_datetime(&user.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db)
                if db.kind() == sqlx::error::ErrorKind::UniqueViolation =>
            {
                RepositoryError::Conflict(user.email.clone())
            }
            _ => RepositoryError::Query(e.to_string()),
        })?;

        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        // The email column is COLLATE NOCASE, so the comparison is
        // case-insensitive even for rows predating normalization.
        let row = sqlx::query("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let user_row =
                    UserRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(user_row.into_user()?))
            }
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, user_id: &Uuid) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(user_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let user_row =
                    UserRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(user_row.into_user()?))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    fn make_user(email: &str) -> User {
        User {
            id: Uuid::now_v7(),
            username: "ada".to_string(),
            email: email.to_string(),
            hashed_password: "$argon2id$fake".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let repo = SqliteUserRepository::new(test_pool().await);
        let user = make_user("ada@example.com");

        repo.create_user(&user).await.unwrap();

        let by_email = repo.find_by_email("ada@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, user.id);
        assert_eq!(by_email.hashed_password, "$argon2id$fake");

        let by_id = repo.find_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let repo = SqliteUserRepository::new(test_pool().await);

        repo.create_user(&make_user("ada@example.com")).await.unwrap();

        // The unique index is case-insensitive.
        let err = repo
            .create_user(&make_user("ADA@EXAMPLE.COM"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_find_by_email_ignores_case() {
        let repo = SqliteUserRepository::new(test_pool().await);
        let user = make_user("ada@example.com");
        repo.create_user(&user).await.unwrap();

        let found = repo.find_by_email("Ada@Example.Com").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));
    }

    #[tokio::test]
    async fn test_find_missing_user() {
        let repo = SqliteUserRepository::new(test_pool().await);
        assert!(repo.find_by_email("nobody@example.com").await.unwrap().is_none());
        assert!(repo.find_by_id(&Uuid::now_v7()).await.unwrap().is_none());
    }
}
