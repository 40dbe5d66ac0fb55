//! HS256 bearer tokens.
//!
//! Access tokens are JWTs signed with a shared secret. Claims carry only the
//! user id, issued-at, and expiry; everything else about the user comes from
//! the database on each request.

use confab_core::auth::credentials::TokenService;
use confab_types::error::AuthError;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User id the token was issued for.
    sub: Uuid,
    /// Issued at (seconds since epoch).
    iat: u64,
    /// Expiration time (seconds since epoch).
    exp: u64,
}

/// JWT implementation of the `TokenService` port.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: u64,
}

impl JwtTokenService {
    /// Create a token service signing with the given secret.
    pub fn new(secret: &[u8], ttl_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
            ttl_secs,
        }
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, user_id: &Uuid) -> Result<String, AuthError> {
        let now = jsonwebtoken::get_current_timestamp();
        let claims = Claims {
            sub: *user_id,
            iat: now,
            exp: now + self.ttl_secs,
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Token(e.to_string()))
    }

    fn decode(&self, token: &str) -> Result<Uuid, AuthError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| AuthError::InvalidToken)?;
        Ok(data.claims.sub)
    }
}
