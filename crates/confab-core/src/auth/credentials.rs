//! Credential ports: password hashing and bearer tokens.
//!
//! Defined in confab-core so `AuthService` can hash and verify without
//! coupling to a specific algorithm. The `Argon2PasswordHasher` and
//! `JwtTokenService` adapters live in confab-infra.

use confab_types::error::AuthError;
use uuid::Uuid;

/// Abstraction over password hashing and verification.
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password for storage.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Check a plaintext password against a stored hash.
    ///
    /// Returns `Ok(false)` on mismatch; `Err` only for malformed hashes.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Abstraction over bearer token issuance and verification.
pub trait TokenService: Send + Sync {
    /// Issue a signed token carrying the user id as its subject.
    fn issue(&self, user_id: &Uuid) -> Result<String, AuthError>;

    /// Verify a token and return the user id it was issued for.
    ///
    /// Expired, tampered, and malformed tokens all map to
    /// `AuthError::InvalidToken`.
    fn decode(&self, token: &str) -> Result<Uuid, AuthError>;
}
