//! Bearer token authentication extractor.
//!
//! Extracts the token from `Authorization: Bearer <token>`, verifies it
//! through the auth service, and loads the account it was issued for.
//! Handlers receive the resolved user, so a deleted account fails here
//! rather than deep in a service call.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use confab_types::user::User;

use crate::http::error::AppError;
use crate::state::AppState;

/// The authenticated caller. Extracting this validates the bearer token.
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(parts)?;
        let user = state.auth_service.resolve_token(&token).await?;
        Ok(CurrentUser(user))
    }
}

/// Extract the bearer token from request headers.
fn extract_bearer_token(parts: &Parts) -> Result<String, AppError> {
    if let Some(auth) = parts.headers.get("authorization") {
        let auth_str = auth.to_str().map_err(|_| {
            AppError::Unauthorized("Invalid Authorization header encoding".to_string())
        })?;
        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            return Ok(token.trim().to_string());
        }
    }

    Err(AppError::Unauthorized(
        "Missing bearer token. Provide via 'Authorization: Bearer <token>' header.".to_string(),
    ))
}
